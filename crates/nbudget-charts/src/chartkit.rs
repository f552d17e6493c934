//! # chartkit
//!
//! Core chart primitives: scales, path builders, map projection.
//! Implements Strategy pattern for flexible scale and rendering behaviors.

use nbudget_core::Bounds;
use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    /// Domain widened by `ratio` of its span on both sides.
    /// A zero-width domain is widened by one unit instead.
    pub fn padded_domain(self, min: f64, max: f64, ratio: f64) -> Self {
        let span = max - min;
        let pad = if span > 0.0 { span * ratio } else { 1.0 };
        self.domain(min - pad, max + pad)
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Get domain bounds
    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    /// Generate "nice" tick values (rounded to clean numbers).
    ///
    /// The step is 1, 2, 5 or 10 times a power of ten, picked with D3's
    /// `tickIncrement` thresholds (√50, √10, √2) so the tick count lands
    /// close to `count`.
    pub fn nice_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        let range = max - min;

        if range <= 0.0 || count == 0 {
            return vec![min];
        }

        let rough_step = range / count as f64;
        let magnitude = 10.0_f64.powf(rough_step.log10().floor());
        let residual = rough_step / magnitude;

        let nice_step = if residual >= 50.0_f64.sqrt() {
            10.0 * magnitude
        } else if residual >= 10.0_f64.sqrt() {
            5.0 * magnitude
        } else if residual >= 2.0_f64.sqrt() {
            2.0 * magnitude
        } else {
            magnitude
        };

        let first = (min / nice_step).ceil() as i64;
        let last = (max / nice_step).floor() as i64;

        // Multiplying the index avoids drift from repeated addition
        (first..=last).map(|i| i as f64 * nice_step).collect()
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }
}

// ============================================================================
// GEOGRAPHIC PROJECTION
// ============================================================================

/// Equirectangular projection fitted to a bounding box.
///
/// Longitudes are shrunk by `cos(mid latitude)` so shapes at Danish latitudes
/// keep their proportions; the fitted box is centred in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjection {
    lon_factor: f64,
    scale: f64,
    origin: (f64, f64),
    offset: (f64, f64),
}

impl GeoProjection {
    pub fn fit(bounds: Bounds, width: f64, height: f64, padding: f64) -> Self {
        let (_, mid_lat) = bounds.center();
        let lon_factor = mid_lat.to_radians().cos().abs().max(0.01);

        let geo_w = (bounds.width() * lon_factor).max(f64::EPSILON);
        let geo_h = bounds.height().max(f64::EPSILON);
        let avail_w = (width - 2.0 * padding).max(1.0);
        let avail_h = (height - 2.0 * padding).max(1.0);
        let scale = (avail_w / geo_w).min(avail_h / geo_h);

        let offset = (
            (width - geo_w * scale) / 2.0,
            (height - geo_h * scale) / 2.0,
        );

        Self {
            lon_factor,
            scale,
            origin: (bounds.min_lon, bounds.max_lat),
            offset,
        }
    }

    /// Project `(lon, lat)` to SVG pixel coordinates (y grows downwards)
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.origin.0) * self.lon_factor * self.scale + self.offset.0;
        let y = (self.origin.1 - lat) * self.scale + self.offset.1;
        (x, y)
    }

    /// SVG path for a set of rings; holes render via `fill-rule="evenodd"`
    pub fn rings_path(&self, rings: &[Vec<(f64, f64)>]) -> String {
        let mut builder = PathBuilder::new();
        for ring in rings.iter().filter(|r| r.len() >= 3) {
            let (x0, y0) = self.project(ring[0].0, ring[0].1);
            builder = builder.move_to(x0, y0);
            for &(lon, lat) in &ring[1..] {
                let (x, y) = self.project(lon, lat);
                builder = builder.line_to(x, y);
            }
            builder = builder.close();
        }
        builder.build()
    }

    /// `viewBox` framing the projected bounds with `padding` pixels around
    pub fn viewbox_for(&self, bounds: Bounds, padding: f64) -> String {
        let (x0, y0) = self.project(bounds.min_lon, bounds.max_lat);
        let (x1, y1) = self.project(bounds.max_lon, bounds.min_lat);
        let w = (x1 - x0).max(1.0) + 2.0 * padding;
        let h = (y1 - y0).max(1.0) + 2.0 * padding;
        format!("{:.2} {:.2} {:.2} {:.2}", x0 - padding, y0 - padding, w, h)
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;
}

/// Line path generator
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some((&(x, y), rest)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::new().move_to(x, y);
        for &(x, y) in rest {
            builder = builder.line_to(x, y);
        }
        builder.build()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    LinePath.generate(points)
}

/// Triangle head for a vertical arrow whose tip sits at `(x, tip_y)`,
/// pointing away from `tail_y`
pub fn arrow_head_path(x: f64, tail_y: f64, tip_y: f64, size: f64) -> String {
    let dir = if tip_y < tail_y { -1.0 } else { 1.0 };
    let base_y = tip_y - dir * size * 1.5;
    PathBuilder::new()
        .move_to(x, tip_y)
        .line_to(x - size, base_y)
        .line_to(x + size, base_y)
        .close()
        .build()
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Format a value for axis tick labels
pub fn format_axis_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if abs >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else if abs >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new()
            .domain(0.0, 100.0)
            .range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
    }

    #[test]
    fn test_inverted_range_for_y_axis() {
        let scale = LinearScale::new().domain(0.0, 10.0).range(200.0, 0.0);
        assert_eq!(scale.scale(0.0), 200.0);
        assert_eq!(scale.scale(10.0), 0.0);
    }

    #[test]
    fn test_padded_domain_handles_flat_data() {
        let scale = LinearScale::new().padded_domain(5.0, 5.0, 0.1);
        assert_eq!(scale.domain_bounds(), (4.0, 6.0));

        let scale = LinearScale::new().padded_domain(0.0, 100.0, 0.1);
        assert_eq!(scale.domain_bounds(), (-10.0, 110.0));
    }

    #[test]
    fn test_nice_ticks() {
        let scale = LinearScale::new().domain(-22.0, 130.0);
        let ticks = scale.nice_ticks(5);
        assert_eq!(ticks, vec![-20.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0]);
    }

    #[test]
    fn test_nice_ticks_step_thresholds() {
        // rough step 2.5 is below √10, so the step stays at 2
        let ticks = LinearScale::new().domain(0.0, 10.0).nice_ticks(4);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        // rough step 4 is above √10, so the step grows to 5
        let ticks = LinearScale::new().domain(0.0, 20.0).nice_ticks(5);
        assert_eq!(ticks, vec![0.0, 5.0, 10.0, 15.0, 20.0]);

        assert_eq!(LinearScale::new().domain(3.0, 3.0).nice_ticks(5), vec![3.0]);
    }

    #[test]
    fn test_projection_fits_viewport() {
        let bounds = Bounds {
            min_lon: 8.0,
            min_lat: 54.5,
            max_lon: 15.2,
            max_lat: 57.8,
        };
        let proj = GeoProjection::fit(bounds, 600.0, 400.0, 10.0);

        let (x0, y0) = proj.project(bounds.min_lon, bounds.max_lat);
        let (x1, y1) = proj.project(bounds.max_lon, bounds.min_lat);
        assert!(x0 >= 9.99 && y0 >= 9.99);
        assert!(x1 <= 590.01 && y1 <= 390.01);
        // north is up
        assert!(proj.project(10.0, 57.0).1 < proj.project(10.0, 55.0).1);
    }

    #[test]
    fn test_rings_path_skips_degenerate_rings() {
        let bounds = Bounds {
            min_lon: 0.0,
            min_lat: 0.0,
            max_lon: 1.0,
            max_lat: 1.0,
        };
        let proj = GeoProjection::fit(bounds, 100.0, 100.0, 0.0);
        let rings = vec![
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            vec![(0.5, 0.5), (0.6, 0.6)],
        ];
        let path = proj.rings_path(&rings);
        assert_eq!(path.matches('M').count(), 1);
        assert!(path.ends_with('Z'));
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert_eq!(path, "M0.00,0.00L100.00,100.00Z");
    }

    #[test]
    fn test_line_path_generator() {
        let path = line_path(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        assert!(path.starts_with("M0.00,0.00"));
        assert!(path.contains("L50.00,50.00"));
        assert_eq!(line_path(&[]), "");
    }

    #[test]
    fn test_arrow_head_points_away_from_tail() {
        // upward arrow: tip above tail, base below tip
        let up = arrow_head_path(10.0, 100.0, 20.0, 4.0);
        assert_eq!(up, "M10.00,20.00L6.00,26.00L14.00,26.00Z");
        // downward arrow
        let down = arrow_head_path(10.0, 20.0, 100.0, 4.0);
        assert_eq!(down, "M10.00,100.00L6.00,94.00L14.00,94.00Z");
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(20.0), "20");
        assert_eq!(format_axis_value(2.5), "2.5");
        assert_eq!(format_axis_value(0.25), "0.25");
        assert_eq!(format_axis_value(25_000.0), "25.0k");
    }
}
