//! Main dashboard layout component

use leptos::ev;
use leptos::prelude::*;
use nbudget_charts::Legend;
use nbudget_http::ApiConfig;
use nbudget_state::use_app_state;

use crate::{ChoroplethMap, ErrorBanner, FilterBar, RegionPopup, SearchBox, StatusBar, provide_controller};

#[component]
pub fn Dashboard(#[prop(optional)] api: Option<ApiConfig>) -> impl IntoView {
    let state = use_app_state();
    let controller = provide_controller(state.clone(), api.unwrap_or_default());
    let filters = state.filters;
    let loaded = state.map.loaded;

    // Initial width, then follow window resizes
    if let Some(width) = window().inner_width().ok().and_then(|w| w.as_f64()) {
        state.viewport_width.set(width);
    }
    let viewport = state.viewport_width;
    let _resize = window_event_listener(ev::resize, move |_| {
        if let Some(width) = window().inner_width().ok().and_then(|w| w.as_f64()) {
            viewport.set(width);
        }
    });

    // Reload the layer whenever a filter changes
    Effect::new(move |_| {
        controller.load_map_layer(filters.snapshot());
    });

    // Legend describes the layer on screen, not the pending selection
    let shown = Signal::derive(move || {
        loaded
            .with(|l| l.as_ref().map(|l| l.filters))
            .unwrap_or_else(|| filters.snapshot())
    });
    let legend_title = Signal::derive(move || shown.get().legend_title());
    let legend_suffix = Signal::derive(move || shown.get().legend_suffix().to_string());

    view! {
        <div class="dashboard">
            <header class="dash-header">
                <h1 class="dash-title">"Nitrogen Budget Dashboard"</h1>
                <FilterBar filters=filters />
                <SearchBox />
            </header>

            <ErrorBanner />

            <main class="dash-main">
                <section class="panel map-panel">
                    <div class="panel-content">
                        <ChoroplethMap />
                        <Legend
                            palette=state.map.palette()
                            title=legend_title
                            suffix=legend_suffix
                        />
                    </div>
                </section>
            </main>

            <RegionPopup />

            <footer class="dash-footer">
                <StatusBar />
            </footer>
        </div>
    }
}
