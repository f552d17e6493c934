//! # nbudget-state
//!
//! Reactive state management for the Nitrogen Budget Dashboard.
//! Uses Leptos signals so filter changes, layer loads and popups only touch
//! the parts of the page that depend on them.

pub mod map;
pub mod popup;

pub use map::*;
pub use popup::*;

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use nbudget_core::{AdminLevel, DashError, LandUse, MapView, RegionKey};

// ============================================================================
// FILTERS
// ============================================================================

/// Snapshot of the three filter selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filters {
    pub level: AdminLevel,
    pub view: MapView,
    pub landuse: LandUse,
}

impl Filters {
    pub fn legend_title(&self) -> String {
        self.view.legend_title()
    }

    pub fn legend_suffix(&self) -> &'static str {
        self.view.legend_suffix(self.level)
    }

    /// Popup request for a clicked or searched region under these filters
    pub fn popup_request(&self, key: RegionKey) -> PopupRequest {
        PopupRequest {
            level: self.level,
            key,
            view: self.view,
            landuse: self.landuse,
        }
    }
}

/// Reactive filter selection
#[derive(Clone, Copy)]
pub struct FilterState {
    pub level: RwSignal<AdminLevel>,
    pub view: RwSignal<MapView>,
    pub landuse: RwSignal<LandUse>,
}

impl FilterState {
    pub fn new(initial: Filters) -> Self {
        Self {
            level: RwSignal::new(initial.level),
            view: RwSignal::new(initial.view),
            landuse: RwSignal::new(initial.landuse),
        }
    }

    /// Current selection; tracked when read inside an effect
    pub fn snapshot(&self) -> Filters {
        Filters {
            level: self.level.get(),
            view: self.view.get(),
            landuse: self.landuse.get(),
        }
    }

    pub fn snapshot_untracked(&self) -> Filters {
        Filters {
            level: self.level.get_untracked(),
            view: self.view.get_untracked(),
            landuse: self.landuse.get_untracked(),
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global application state with reactive signals
#[derive(Clone)]
pub struct AppState {
    pub filters: FilterState,
    /// Loaded choropleth, highlight and zoom
    pub map: MapState,
    /// Open region popup
    pub popup: RwSignal<Option<PopupContent>>,
    /// Dismissible error banner text
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    /// When the current map layer finished loading
    pub last_loaded: RwSignal<Option<DateTime<Utc>>>,
    /// Window inner width in CSS pixels
    pub viewport_width: RwSignal<f64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            filters: FilterState::new(Filters::default()),
            map: MapState::new(),
            popup: RwSignal::new(None),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            last_loaded: RwSignal::new(None),
            viewport_width: RwSignal::new(1024.0),
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
    }

    /// Log and surface an error in the banner
    pub fn report(&self, err: &DashError) {
        if err.is_user_error() {
            tracing::info!("user error: {}", err);
        } else {
            tracing::error!("{}", err);
        }
        self.set_error(err.to_string());
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    // ========================================================================
    // Loading State
    // ========================================================================

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    pub fn mark_loaded(&self) {
        self.last_loaded.set(Some(Utc::now()));
        self.loading.set(false);
    }

    // ========================================================================
    // Popup
    // ========================================================================

    pub fn open_popup(&self, content: PopupContent) {
        self.popup.set(Some(content));
    }

    pub fn close_popup(&self) {
        self.popup.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide app state context to component tree
pub fn provide_app_state() -> AppState {
    let state = AppState::new();
    provide_context(state.clone());
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbudget_core::Variable;

    #[test]
    fn test_default_filters() {
        let filters = Filters::default();
        assert_eq!(filters.level, AdminLevel::Kommune);
        assert_eq!(filters.view, MapView::Variable(Variable::N2O));
        assert_eq!(filters.landuse, LandUse::CropGrass);
    }

    #[test]
    fn test_filter_legend_text() {
        let national = Filters {
            level: AdminLevel::National,
            view: MapView::Variable(Variable::NO3),
            landuse: LandUse::Forest,
        };
        assert_eq!(national.legend_suffix(), "(kt N yr⁻¹)");

        let budget = Filters {
            view: MapView::FullBudget,
            ..national
        };
        assert_eq!(budget.legend_title(), "Average Cumulative N Surplus");
        assert_eq!(budget.legend_suffix(), "(t N ha⁻¹ yr⁻¹)");
    }

    #[test]
    fn test_popup_request_carries_filters() {
        let filters = Filters {
            level: AdminLevel::Treparter,
            view: MapView::FullBudget,
            landuse: LandUse::Livestock,
        };
        let request = filters.popup_request(RegionKey::new("17"));
        assert_eq!(request.level, AdminLevel::Treparter);
        assert_eq!(request.view, MapView::FullBudget);
        assert_eq!(request.name(), "17");
    }
}
