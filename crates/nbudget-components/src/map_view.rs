//! SVG choropleth map

use crate::controller::use_controller;
use leptos::prelude::*;
use nbudget_charts::{GeoProjection, colors};
use nbudget_core::{MapView, SelectableRegion};
use nbudget_state::{LoadedLayer, use_app_state};

/// Map rendering configuration
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    /// Pixels kept free around the fitted layer
    pub padding: f64,
    pub stroke_width: f64,
    /// Thinner outline used for the full budget view
    pub budget_stroke_width: f64,
    pub highlight_width: f64,
    pub fill_opacity: f64,
    /// Extra room around a zoomed-to region, in pixels
    pub focus_padding: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 700.0,
            padding: 12.0,
            stroke_width: 1.0,
            budget_stroke_width: 0.5,
            highlight_width: 3.0,
            fill_opacity: 0.7,
            focus_padding: 20.0,
        }
    }
}

impl MapConfig {
    /// Outline colour and width for the view being shown
    pub fn outline(&self, view: MapView) -> (&'static str, f64) {
        match view {
            MapView::FullBudget => (colors::BUDGET_STROKE, self.budget_stroke_width),
            MapView::Variable(_) => (colors::REGION_STROKE, self.stroke_width),
        }
    }
}

#[component]
pub fn ChoroplethMap(#[prop(optional)] config: Option<MapConfig>) -> impl IntoView {
    let config = config.unwrap_or_default();
    let state = use_app_state();
    let controller = use_controller();
    let loaded = state.map.loaded;
    let highlight = state.map.highlight;
    let map = state.map;
    let focus = map.focus;

    let (width, height, padding) = (config.width, config.height, config.padding);

    // Projection follows the loaded layer's extent
    let projection = Memo::new(move |_| {
        loaded.with(|l| {
            l.as_ref()
                .and_then(|l| l.layer.bounds())
                .map(|bounds| GeoProjection::fit(bounds, width, height, padding))
        })
    });

    let focus_padding = config.focus_padding;
    let viewbox = move || {
        let full = format!("0 0 {} {}", width, height);
        match (projection.get(), focus.get()) {
            (Some(proj), Some(bounds)) => proj.viewbox_for(bounds, focus_padding),
            _ => full,
        }
    };

    let regions_config = config.clone();
    let regions = move || {
        let proj = projection.get()?;
        let outline_config = regions_config.clone();
        let controller = controller.clone();
        loaded.with(|loaded| {
            let loaded: &LoadedLayer = loaded.as_ref()?;
            let (stroke, stroke_width) = outline_config.outline(loaded.filters.view);
            let views = loaded.layer.features.iter().map(|feature| {
                let d = proj.rings_path(&feature.rings);
                let fill = loaded.fill_for(&feature.key).to_string();
                let controller = controller.clone();
                let select = feature.on_select(move |selection| controller.select(selection.key));
                view! {
                    <path
                        class="region"
                        d=d
                        fill=fill
                        fill-opacity=outline_config.fill_opacity
                        fill-rule="evenodd"
                        stroke=stroke
                        stroke-width=stroke_width
                        on:click=move |_| select()
                    />
                }
            }).collect_view();
            Some(views)
        })
    };

    // Separate pass so the highlight stroke is never covered by neighbours
    let highlight_width = config.highlight_width;
    let highlighted = move || {
        let key = highlight.get()?;
        let proj = projection.get()?;
        loaded.with(|loaded| {
            let feature = loaded.as_ref()?.layer.features.iter().find(|f| f.key == key)?;
            Some(view! {
                <path
                    class="region-highlight"
                    d=proj.rings_path(&feature.rings)
                    fill="none"
                    fill-rule="evenodd"
                    stroke=colors::HIGHLIGHT
                    stroke-width=highlight_width
                    pointer-events="none"
                />
            })
        })
    };

    view! {
        <div class="map-container">
            <svg
                class="choropleth-map"
                viewBox=viewbox
                preserveAspectRatio="xMidYMid meet"
                style="width: 100%; height: 100%;"
            >
                <g class="regions">{regions}</g>
                <g class="highlight">{highlighted}</g>
            </svg>
            {move || focus.get().is_some().then(|| view! {
                <button class="map-reset" on:click=move |_| map.reset_zoom()>"Reset view"</button>
            })}
        </div>
    }
}
