//! # nbudget-components
//!
//! Leptos UI components for the Nitrogen Budget Dashboard: filter bar,
//! choropleth map, search, region popup, status bar and the controller that
//! ties them to the backend.

pub mod controller;
pub mod dashboard;
pub mod filter_bar;
pub mod map_view;
pub mod popup;
pub mod search_box;
pub mod status;

pub use controller::*;
pub use dashboard::*;
pub use filter_bar::*;
pub use map_view::*;
pub use popup::*;
pub use search_box::*;
pub use status::*;

#[cfg(test)]
mod tests {
    use super::*;
    use nbudget_core::{MapView, Variable, colors};

    #[test]
    fn test_outline_follows_view() {
        let config = MapConfig::default();
        assert_eq!(config.outline(MapView::FullBudget), (colors::BUDGET_STROKE, 0.5));
        assert_eq!(
            config.outline(MapView::Variable(Variable::NO3)),
            (colors::REGION_STROKE, 1.0)
        );
    }
}
