//! Level, variable and land-use selects

use leptos::prelude::*;
use nbudget_core::{AdminLevel, LandUse, MapView};
use nbudget_state::FilterState;

#[component]
pub fn FilterBar(filters: FilterState) -> impl IntoView {
    let level = filters.level;
    let view = filters.view;
    let landuse = filters.landuse;

    let level_options = AdminLevel::all()
        .iter()
        .copied()
        .map(|l| {
            view! {
                <option value=l.as_str() selected=move || level.get() == l>
                    {l.label()}
                </option>
            }
        })
        .collect_view();

    let view_options = MapView::all()
        .into_iter()
        .map(|v| {
            view! {
                <option value=v.as_str() selected=move || view.get() == v>
                    {v.label()}
                </option>
            }
        })
        .collect_view();

    let landuse_options = LandUse::all()
        .iter()
        .copied()
        .map(|u| {
            view! {
                <option value=u.as_str() selected=move || landuse.get() == u>
                    {u.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <div class="filter-bar">
            <label class="fb-field">
                <span class="fb-label">"Level"</span>
                <select
                    id="level-select"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        match AdminLevel::parse(&value) {
                            Some(l) => level.set(l),
                            None => tracing::warn!(value = %value, "unknown level"),
                        }
                    }
                >
                    {level_options}
                </select>
            </label>

            <label class="fb-field">
                <span class="fb-label">"Variable"</span>
                <select
                    id="variable-select"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        match MapView::parse(&value) {
                            Some(v) => view.set(v),
                            None => tracing::warn!(value = %value, "unknown variable"),
                        }
                    }
                >
                    {view_options}
                </select>
            </label>

            <label class="fb-field">
                <span class="fb-label">"Land use"</span>
                <select
                    id="landuse-select"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        match LandUse::parse(&value) {
                            Some(u) => landuse.set(u),
                            None => tracing::warn!(value = %value, "unknown land use"),
                        }
                    }
                >
                    {landuse_options}
                </select>
            </label>
        </div>
    }
}
