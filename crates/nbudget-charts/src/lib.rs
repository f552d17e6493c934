//! # nbudget-charts
//!
//! D3.js-style SVG charting built with Leptos for the nitrogen dashboard.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear, geographic projection)
//! - Path generation (line, polygon)
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, projection, arrow heads
//! - `axes` - Shared axis, grid and title components
//! - `palette` - Equal-width choropleth colour binning
//! - `flow` - Cumulative flow (waterfall) layout
//! - `waterfall` - Nitrogen budget chart component
//! - `timeseries` - Yearly line chart component
//! - `legend` - Choropleth legend component

pub mod axes;
pub mod chartkit;
pub mod flow;
pub mod legend;
pub mod palette;
pub mod timeseries;
pub mod waterfall;

pub use axes::*;
pub use chartkit::*;
pub use flow::*;
pub use legend::*;
pub use palette::*;
pub use timeseries::*;
pub use waterfall::*;

// Re-export colors from nbudget-core for convenience
pub use nbudget_core::colors;

/// Viewport width at or below which compact chart presets are used
pub const COMPACT_BREAKPOINT_PX: f64 = 768.0;

/// Chart margin configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Popup chart margins (room for title and both axis titles)
    pub const fn standard() -> Self {
        Self::new(60.0, 20.0, 50.0, 70.0)
    }

    /// Small-screen popup margins
    pub const fn compact() -> Self {
        Self::new(40.0, 10.0, 30.0, 45.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// SVG transform for inner chart area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Whether a viewport of the given width should get compact charts
pub fn is_compact_width(width_px: f64) -> bool {
    width_px <= COMPACT_BREAKPOINT_PX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_dimensions() {
        let dims = ChartDimensions::new(400.0, 300.0).with_margin(ChartMargin::standard());
        assert_eq!(dims.inner_width(), 310.0);
        assert_eq!(dims.inner_height(), 190.0);
        assert_eq!(dims.inner_transform(), "translate(70, 60)");
        assert_eq!(dims.viewbox(), "0 0 400 300");
    }

    #[test]
    fn test_compact_breakpoint() {
        assert!(is_compact_width(768.0));
        assert!(!is_compact_width(1024.0));
    }
}
