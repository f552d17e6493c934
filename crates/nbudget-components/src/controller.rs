//! Map/chart binding: turns filter changes, clicks and searches into backend
//! requests and applies the results to [`AppState`].
//!
//! Each channel (map layer, popup) has its own [`RequestSequencer`]; a result
//! is applied only while its ticket is still the latest one.

use futures::future::try_join;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use nbudget_core::{DashError, MapView, RegionKey, RegionLayer, RegionValues};
use nbudget_http::{ApiClient, ApiConfig, ApiError, RequestSequencer, RequestTicket};
use nbudget_state::{
    AppState, Filters, HIGHLIGHT_MS, LoadedLayer, PopupBody, PopupContent, PopupRequest,
    budget_body, series_body,
};
use wasm_bindgen_futures::spawn_local;

#[derive(Clone)]
pub struct DashboardController {
    state: AppState,
    client: ApiClient,
    map_requests: RequestSequencer,
    popup_requests: RequestSequencer,
}

impl DashboardController {
    pub fn new(state: AppState, config: ApiConfig) -> Self {
        Self {
            state,
            client: ApiClient::new(config),
            map_requests: RequestSequencer::new(),
            popup_requests: RequestSequencer::new(),
        }
    }

    // ========================================================================
    // Map layer
    // ========================================================================

    /// Reload the choropleth for `filters`, superseding any in-flight load
    pub fn load_map_layer(&self, filters: Filters) {
        let ticket = self.map_requests.issue();
        let this = self.clone();
        tracing::info!(
            level = filters.level.as_str(),
            view = filters.view.as_str(),
            landuse = filters.landuse.as_str(),
            ticket = ticket.id(),
            "loading map layer"
        );
        self.state.set_loading(true);

        spawn_local(async move {
            let result = this.fetch_layer(filters).await;
            apply_if_current(
                &ticket,
                result,
                |loaded| {
                    this.state.map.install(loaded);
                    this.state.mark_loaded();
                },
                |err| {
                    this.state.set_loading(false);
                    this.state.report(&err.into());
                },
            );
        });
    }

    async fn fetch_layer(&self, filters: Filters) -> Result<LoadedLayer, ApiError> {
        let level = filters.level;
        let values = async {
            match filters.view {
                MapView::FullBudget => {
                    let surplus = self.client.all_n_surplus(level, filters.landuse).await?;
                    Ok::<_, ApiError>(RegionValues::from_surplus(&surplus))
                }
                MapView::Variable(variable) => {
                    let rows = self.client.totals(level, variable).await?;
                    Ok::<_, ApiError>(RegionValues::from_totals(&rows, level, variable))
                }
            }
        };
        let (collection, values) = try_join(self.client.geojson(level), values).await?;
        let layer = RegionLayer::from_collection(&collection, level);
        Ok(LoadedLayer::build(layer, values, filters))
    }

    // ========================================================================
    // Popup
    // ========================================================================

    /// Open the popup for a region and fetch its chart data
    pub fn open_region_popup(&self, request: PopupRequest) {
        let ticket = self.popup_requests.issue();
        let this = self.clone();
        tracing::info!(
            region = request.name(),
            view = request.view.as_str(),
            "opening region popup"
        );
        self.state.open_popup(PopupContent::loading(request.clone()));

        spawn_local(async move {
            let result = this.fetch_popup_body(&request).await;
            apply_if_current(
                &ticket,
                result,
                |body| {
                    this.state.popup.update(|popup| {
                        let pending = popup
                            .as_mut()
                            .filter(|content| content.is_loading() && content.request == request);
                        if let Some(content) = pending {
                            content.body = body;
                        }
                    })
                },
                |err| {
                    this.state.close_popup();
                    this.state.report(&err);
                },
            );
        });
    }

    async fn fetch_popup_body(&self, request: &PopupRequest) -> Result<PopupBody, DashError> {
        match request.view {
            MapView::Variable(variable) => {
                let rows = self
                    .client
                    .chart_data(request.level, request.name(), variable, request.landuse)
                    .await?;
                series_body(&rows, variable, request.level)
            }
            MapView::FullBudget => {
                let budget = self
                    .client
                    .full_n_chart_data(request.level, request.name(), request.landuse)
                    .await?;
                budget_body(&budget)
            }
        }
    }

    /// Close the popup and drop any response still on its way
    pub fn close_popup(&self) {
        self.popup_requests.invalidate();
        self.state.close_popup();
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Zoom to, highlight and open the popup of the region named `query`
    pub fn search(&self, query: &str) {
        let key = match self.state.map.search(query) {
            Ok(key) => key,
            Err(err) => {
                self.state.report(&err.into());
                return;
            }
        };
        self.state.clear_error();

        let map = self.state.map;
        let highlighted = key.clone();
        Timeout::new(HIGHLIGHT_MS, move || map.clear_highlight(&highlighted)).forget();

        let filters = self.layer_filters();
        self.open_region_popup(filters.popup_request(key));
    }

    /// Region clicked on the map
    pub fn select(&self, key: RegionKey) {
        let filters = self.layer_filters();
        self.open_region_popup(filters.popup_request(key));
    }

    /// Filters the visible layer was loaded with, so popups match the map
    fn layer_filters(&self) -> Filters {
        self.state
            .map
            .loaded
            .with_untracked(|loaded| loaded.as_ref().map(|l| l.filters))
            .unwrap_or_else(|| self.state.filters.snapshot_untracked())
    }
}

/// Hand `result` to `on_ok` or `on_err` only while `ticket` is still the
/// latest on its channel. Returns whether anything was applied.
fn apply_if_current<T, E>(
    ticket: &RequestTicket,
    result: Result<T, E>,
    on_ok: impl FnOnce(T),
    on_err: impl FnOnce(E),
) -> bool {
    if ticket.ensure_current().is_err() {
        return false;
    }
    match result {
        Ok(value) => on_ok(value),
        Err(err) => on_err(err),
    }
    true
}

/// Provide a controller to the component tree
pub fn provide_controller(state: AppState, config: ApiConfig) -> DashboardController {
    let controller = DashboardController::new(state, config);
    provide_context(controller.clone());
    controller
}

pub fn use_controller() -> DashboardController {
    expect_context::<DashboardController>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_current_ticket_applies_result() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        let applied = RefCell::new(Vec::new());

        let ok: Result<u32, &str> = Ok(7);
        assert!(apply_if_current(
            &ticket,
            ok,
            |v| applied.borrow_mut().push(format!("ok {}", v)),
            |e| applied.borrow_mut().push(format!("err {}", e)),
        ));

        let err: Result<u32, &str> = Err("timeout");
        assert!(apply_if_current(
            &ticket,
            err,
            |v| applied.borrow_mut().push(format!("ok {}", v)),
            |e| applied.borrow_mut().push(format!("err {}", e)),
        ));
        assert_eq!(*applied.borrow(), vec!["ok 7", "err timeout"]);
    }

    #[test]
    fn test_superseded_ticket_never_applies() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let _second = seq.issue();
        let touched = RefCell::new(0);

        let ok: Result<u32, &str> = Ok(1);
        assert!(!apply_if_current(&first, ok, |_| *touched.borrow_mut() += 1, |_| *touched.borrow_mut() += 1));
        let err: Result<u32, &str> = Err("late");
        assert!(!apply_if_current(&first, err, |_| *touched.borrow_mut() += 1, |_| *touched.borrow_mut() += 1));
        assert_eq!(*touched.borrow(), 0);
    }

    #[test]
    fn test_closed_popup_drops_pending_response() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        seq.invalidate();
        let touched = RefCell::new(false);

        let ok: Result<(), &str> = Ok(());
        assert!(!apply_if_current(&ticket, ok, |_| *touched.borrow_mut() = true, |_| {}));
        assert!(!*touched.borrow());
    }
}
