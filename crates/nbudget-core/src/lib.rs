//! # nbudget-core
//!
//! Core domain types for the Nitrogen Budget Dashboard.
//! Implements Strategy pattern for value formatting.

pub mod error;
pub mod flux;
pub mod geo;
pub mod level;
pub mod wire;

pub use error::*;
pub use flux::*;
pub use geo::*;
pub use level::*;
pub use wire::*;

use serde::{Deserialize, Serialize};

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for numeric value formatting
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Fixed decimal formatter (flux magnitudes, annotations)
#[derive(Debug, Clone)]
pub struct FixedDecimalFormatter {
    pub decimals: usize,
}

impl Default for FixedDecimalFormatter {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl ValueFormatter for FixedDecimalFormatter {
    fn format(&self, value: f64) -> String {
        format!("{:.prec$}", value, prec = self.decimals)
    }
}

/// Legend formatter: two decimals, dash for missing/non-finite values
#[derive(Debug, Clone, Default)]
pub struct LegendValueFormatter;

impl ValueFormatter for LegendValueFormatter {
    fn format(&self, value: f64) -> String {
        if value.is_finite() {
            format!("{:.2}", value)
        } else {
            "–".to_string()
        }
    }
}

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// Region identifier as stored in the level's GeoJSON property
/// (e.g. "Aarhus", "Region Midtjylland", "1234")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey(pub String);

impl RegionKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used by feature search
    pub fn matches_query(&self, query: &str) -> bool {
        self.0.to_lowercase() == query.trim().to_lowercase()
    }

    /// Build a key from an arbitrary JSON property value.
    ///
    /// Numeric ids (treparter `ogc_fid`) are stringified the same way the
    /// backend does, so `12` and `"12"` address the same region.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self(s.clone())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            serde_json::Value::Bool(b) => Some(Self(b.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel linear interpolation, rounded to the nearest integer.
    /// `factor` 0 yields `self`, 1 yields `other`.
    pub fn lerp(self, other: Rgb, factor: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + factor * (b as f64 - a as f64);
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl std::fmt::Display for Rgb {
    /// CSS `rgb(r,g,b)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    use super::Rgb;

    /// Choropleth ramp endpoints
    pub const RAMP_LOW: Rgb = Rgb::new(0x37, 0x0F, 0x90);
    pub const RAMP_HIGH: Rgb = Rgb::new(0xF1, 0xF6, 0x37);
    /// Legend swatch before any data has been binned
    pub const PLACEHOLDER: Rgb = Rgb::new(0xFF, 0xED, 0xA0);

    // Flux categories
    pub const INPUT: &str = "maroon";
    pub const HARVEST: &str = "green";
    pub const LEACHING: &str = "blue";
    pub const EMISSION: &str = "red";
    pub const NEUTRAL: &str = "gray";

    pub const ANNOTATION: &str = "black";
    pub const AXIS: &str = "black";
    pub const GRID: &str = "lightgray";
    pub const BG_PLOT: &str = "white";

    pub const SERIES_LINE: &str = "#007BFF";
    pub const SERIES_MARKER: &str = "#FF5733";

    pub const REGION_STROKE: &str = "#333333";
    pub const BUDGET_STROKE: &str = "grey";
    pub const HIGHLIGHT: &str = "#ff0000";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_lerp_endpoints() {
        let low = colors::RAMP_LOW;
        let high = colors::RAMP_HIGH;
        assert_eq!(low.lerp(high, 0.0), low);
        assert_eq!(low.lerp(high, 1.0), high);
        assert_eq!(low.to_string(), "rgb(55,15,144)");
        assert_eq!(high.to_string(), "rgb(241,246,55)");
    }

    #[test]
    fn test_rgb_lerp_rounds_half_up() {
        let mid = Rgb::new(0, 0, 0).lerp(Rgb::new(1, 3, 255), 0.5);
        assert_eq!(mid, Rgb::new(1, 2, 128));
    }

    #[test]
    fn test_legend_formatter() {
        let formatter = LegendValueFormatter;
        assert_eq!(formatter.format(12.345), "12.35");
        assert_eq!(formatter.format(f64::NAN), "–");
        assert_eq!(formatter.format(f64::INFINITY), "–");
    }

    #[test]
    fn test_region_key_from_json() {
        assert_eq!(
            RegionKey::from_json(&serde_json::json!(12)),
            Some(RegionKey::new("12"))
        );
        assert_eq!(
            RegionKey::from_json(&serde_json::json!("Aarhus")),
            Some(RegionKey::new("Aarhus"))
        );
        assert_eq!(RegionKey::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_region_key_query_is_case_insensitive() {
        let key = RegionKey::new("Aarhus");
        assert!(key.matches_query("aarhus"));
        assert!(key.matches_query("  AARHUS "));
        assert!(!key.matches_query("Aalborg"));
    }
}
