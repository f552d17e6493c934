//! # palette
//!
//! Equal-width choropleth binning. A [`Palette`] is an immutable value built
//! once per filter change and handed to both the map and the legend.

use nbudget_core::{LegendValueFormatter, PaletteError, Rgb, ValueFormatter, colors};
use tracing::debug;

/// Binning configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteConfig {
    pub bin_count: usize,
    pub low: Rgb,
    pub high: Rgb,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            bin_count: 10,
            low: colors::RAMP_LOW,
            high: colors::RAMP_HIGH,
        }
    }
}

/// Colour of bin `index` out of `count`, interpolated between the endpoints.
/// A single bin takes the low endpoint.
pub fn ramp_color(index: usize, count: usize, low: Rgb, high: Rgb) -> Rgb {
    let factor = if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    };
    low.lerp(high, factor)
}

/// Half-open interval `[lower, upper)` with its fill colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBin {
    pub lower: f64,
    pub upper: f64,
    pub color: Rgb,
}

/// One legend line, highest bin first
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub color: Rgb,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    bins: Vec<ColorBin>,
    min: f64,
    max: f64,
}

impl Palette {
    /// Bin `values` into `config.bin_count` equal-width intervals spanning
    /// `[min, max]`. Non-finite observations are ignored.
    pub fn from_values(values: &[f64], config: PaletteConfig) -> Result<Self, PaletteError> {
        if config.bin_count == 0 {
            return Err(PaletteError::ZeroBins);
        }

        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(PaletteError::EmptyDataset)?;

        let n = config.bin_count;
        let width = (max - min) / n as f64;
        let lowers: Vec<f64> = (0..n).map(|i| min + i as f64 * width).collect();

        let bins = lowers
            .iter()
            .enumerate()
            .map(|(i, &lower)| ColorBin {
                lower,
                upper: lowers.get(i + 1).copied().unwrap_or(max),
                color: ramp_color(i, n, config.low, config.high),
            })
            .collect();

        debug!(bins = n, min, max, "palette built");
        Ok(Self { bins, min, max })
    }

    /// Palette shown before any data has loaded
    pub fn placeholder() -> Self {
        let bins = (0..PaletteConfig::default().bin_count)
            .map(|_| ColorBin {
                lower: 0.0,
                upper: 0.0,
                color: colors::PLACEHOLDER,
            })
            .collect();
        Self {
            bins,
            min: 0.0,
            max: 0.0,
        }
    }

    pub fn bins(&self) -> &[ColorBin] {
        &self.bins
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Index of the bin holding `value`: the highest bin whose lower bound is
    /// `<= value`, else bin 0. A zero-width palette always resolves to bin 0.
    pub fn bin_index(&self, value: f64) -> usize {
        if self.max <= self.min {
            return 0;
        }
        self.bins
            .iter()
            .rposition(|bin| bin.lower <= value)
            .unwrap_or(0)
    }

    pub fn color_for(&self, value: f64) -> Rgb {
        self.bins
            .get(self.bin_index(value))
            .map(|bin| bin.color)
            .unwrap_or(colors::PLACEHOLDER)
    }

    /// Legend lines from highest bin to lowest
    pub fn legend_rows(&self) -> Vec<LegendRow> {
        let fmt = LegendValueFormatter;
        self.bins
            .iter()
            .rev()
            .map(|bin| LegendRow {
                color: bin.color,
                label: format!("{}–{}", fmt.format(bin.lower), fmt.format(bin.upper)),
            })
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::placeholder()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_to_hundred() -> Palette {
        Palette::from_values(&[0.0, 37.0, 100.0, 64.5], PaletteConfig::default()).unwrap()
    }

    #[test]
    fn test_equal_width_bounds() {
        let palette = zero_to_hundred();
        assert_eq!(palette.bins().len(), 10);
        for (i, bin) in palette.bins().iter().enumerate() {
            assert_eq!(bin.lower, i as f64 * 10.0);
        }
        assert_eq!(palette.bins()[9].upper, 100.0);
        assert_eq!(palette.bins()[3].upper, palette.bins()[4].lower);
    }

    #[test]
    fn test_ramp_endpoints_are_exact() {
        let palette = zero_to_hundred();
        assert_eq!(palette.bins()[0].color, colors::RAMP_LOW);
        assert_eq!(palette.bins()[9].color, colors::RAMP_HIGH);
        assert_eq!(ramp_color(0, 1, colors::RAMP_LOW, colors::RAMP_HIGH), colors::RAMP_LOW);
    }

    #[test]
    fn test_value_on_bound_takes_that_bin() {
        let palette = zero_to_hundred();
        assert_eq!(palette.bin_index(30.0), 3);
        assert_eq!(palette.color_for(30.0), palette.bins()[3].color);
        assert_eq!(palette.bin_index(29.999), 2);
        assert_eq!(palette.bin_index(100.0), 9);
    }

    #[test]
    fn test_out_of_range_falls_back_to_lowest() {
        let palette = zero_to_hundred();
        assert_eq!(palette.bin_index(-5.0), 0);
        assert_eq!(palette.bin_index(f64::NAN), 0);
        assert_eq!(palette.bin_index(1e9), 9);
    }

    #[test]
    fn test_identical_values_collapse() {
        let palette = Palette::from_values(&[0.0, 0.0, 0.0], PaletteConfig::default()).unwrap();
        assert!(palette.bins().iter().all(|b| b.lower == 0.0 && !b.lower.is_nan()));
        assert_eq!(palette.bin_index(0.0), 0);
        assert_eq!(palette.bin_index(-1.0), 0);
        assert_eq!(palette.color_for(5.0), colors::RAMP_LOW);
    }

    #[test]
    fn test_empty_and_zero_bins_are_errors() {
        assert_eq!(
            Palette::from_values(&[], PaletteConfig::default()),
            Err(PaletteError::EmptyDataset)
        );
        assert_eq!(
            Palette::from_values(&[f64::NAN], PaletteConfig::default()),
            Err(PaletteError::EmptyDataset)
        );
        assert_eq!(
            Palette::from_values(&[1.0], PaletteConfig {
                bin_count: 0,
                ..PaletteConfig::default()
            }),
            Err(PaletteError::ZeroBins)
        );
    }

    #[test]
    fn test_legend_rows_descend() {
        let rows = zero_to_hundred().legend_rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].label, "90.00–100.00");
        assert_eq!(rows[0].color, colors::RAMP_HIGH);
        assert_eq!(rows[9].label, "0.00–10.00");
    }

    #[test]
    fn test_placeholder_palette() {
        let palette = Palette::placeholder();
        assert_eq!(palette.bins().len(), 10);
        assert!(palette.bins().iter().all(|b| b.color == colors::PLACEHOLDER));
        assert_eq!(palette.legend_rows()[0].label, "0.00–0.00");
    }
}
