//! Footer status bar and dismissible error banner

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use nbudget_state::use_app_state;

/// "HH:MM:SS UTC" for the last layer load, or a dash before the first one
pub fn format_loaded_at(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%H:%M:%S UTC").to_string(),
        None => "–".to_string(),
    }
}

#[component]
pub fn StatusBar() -> impl IntoView {
    let state = use_app_state();
    let loading = state.loading;
    let last_loaded = state.last_loaded;
    let loaded = state.map.loaded;
    let filters = state.filters;

    view! {
        <div class="status-bar">
            <div class="sb-item">
                <span class="sb-label">"Status:"</span>
                <span class=move || if loading.get() { "sb-value loading" } else { "sb-value ready" }>
                    {move || if loading.get() { "Loading" } else { "Ready" }}
                </span>
            </div>

            <div class="sb-item">
                <span class="sb-label">"Regions:"</span>
                <span class="sb-value">
                    {move || loaded.with(|l| l.as_ref().map(|l| l.layer.len()).unwrap_or(0))}
                </span>
            </div>

            <div class="sb-item">
                <span class="sb-label">"Layer:"</span>
                <span class="sb-value">
                    {move || {
                        let f = filters.snapshot();
                        format!("{} / {} / {}", f.level.label(), f.view.label(), f.landuse.label())
                    }}
                </span>
            </div>

            <div class="sb-item">
                <span class="sb-label">"Updated:"</span>
                <span class="sb-value">{move || format_loaded_at(last_loaded.get())}</span>
            </div>

            <div class="sb-version">
                <span>"v0.1.0"</span>
            </div>
        </div>
    }
}

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let state = use_app_state();
    let error = state.error;

    move || {
        error.get().map(|e| {
            view! {
                <div class="error-banner" role="alert">
                    <span class="error-icon">"⚠"</span>
                    <span class="error-msg">{e}</span>
                    <button class="error-dismiss" on:click=move |_| error.set(None)>
                        "Dismiss"
                    </button>
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_loaded_at() {
        assert_eq!(format_loaded_at(None), "–");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 4, 9).unwrap();
        assert_eq!(format_loaded_at(Some(at)), "13:04:09 UTC");
    }
}
