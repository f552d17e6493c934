//! Region popup: time series or nitrogen budget chart

use crate::controller::use_controller;
use leptos::prelude::*;
use nbudget_charts::{NitrogenBudgetChart, TimeSeriesChart, TimeSeriesConfig, WaterfallConfig};
use nbudget_state::{PopupBody, use_app_state};

#[component]
pub fn RegionPopup() -> impl IntoView {
    let state = use_app_state();
    let controller = use_controller();
    let popup = state.popup;
    let viewport = state.viewport_width;

    move || {
        let content = popup.get()?;
        let controller = controller.clone();
        let width = viewport.get();

        let body = match content.body {
            PopupBody::Loading => view! {
                <div class="popup-loading">"Loading chart..."</div>
            }
            .into_any(),
            PopupBody::Series { series, y_title, .. } => view! {
                <TimeSeriesChart
                    series=series
                    title=content.title.clone()
                    y_title=y_title
                    config=TimeSeriesConfig::for_viewport(width)
                />
            }
            .into_any(),
            PopupBody::Budget(layout) => view! {
                <NitrogenBudgetChart
                    layout=layout
                    title=content.title.clone()
                    config=WaterfallConfig::for_viewport(width)
                />
            }
            .into_any(),
        };

        Some(view! {
            <div class="popup-overlay">
                <div class="popup panel">
                    <div class="panel-header">
                        <span class="panel-title">{content.title.clone()}</span>
                        <button
                            class="popup-close"
                            title="Close"
                            on:click=move |_| controller.close_popup()
                        >
                            "×"
                        </button>
                    </div>
                    <div class="panel-content">{body}</div>
                </div>
            </div>
        })
    }
}
