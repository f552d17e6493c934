//! Choropleth legend: one swatch per bin, highest first

use crate::palette::Palette;
use leptos::prelude::*;

#[component]
pub fn Legend(
    #[prop(into)] palette: Signal<Palette>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] suffix: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="legend">
            <div class="legend-title">
                <strong>{move || title.get()}</strong>
                <br />
                <span class="legend-suffix">{move || suffix.get()}</span>
            </div>
            {move || {
                palette.get().legend_rows().into_iter().map(|row| {
                    view! {
                        <div class="legend-row">
                            <i
                                class="legend-swatch"
                                style=format!("background:{}", row.color)
                            ></i>
                            <span>{row.label}</span>
                        </div>
                    }
                }).collect_view()
            }}
        </div>
    }
}
