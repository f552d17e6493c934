//! Yearly time-series chart (line + markers) for the region popup

use crate::{
    ChartDimensions, ChartMargin,
    axes::{ChartTitle, YAxis, ZeroLine},
    chartkit::{LinearScale, Scale, line_path},
    colors,
};
use nbudget_core::TimeSeries;
use leptos::prelude::*;

/// Time-series chart configuration
#[derive(Debug, Clone)]
pub struct TimeSeriesConfig {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
    pub line_width: f64,
    pub marker_radius: f64,
    pub title_font: f64,
    pub axis_title_font: f64,
    pub tick_font: f64,
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 400.0,
            margin: ChartMargin::standard(),
            line_width: 2.0,
            marker_radius: 4.0,
            title_font: 18.0,
            axis_title_font: 14.0,
            tick_font: 12.0,
        }
    }
}

impl TimeSeriesConfig {
    pub fn compact() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: ChartMargin::compact(),
            line_width: 1.5,
            marker_radius: 3.0,
            title_font: 10.0,
            axis_title_font: 10.0,
            tick_font: 8.0,
        }
    }

    pub fn for_viewport(width_px: f64) -> Self {
        if crate::is_compact_width(width_px) {
            Self::compact()
        } else {
            Self::default()
        }
    }
}

/// Whole-year ticks across `[first, last]`, thinned to roughly `count`
pub fn year_ticks(first: i32, last: i32, count: usize) -> Vec<i32> {
    if last <= first {
        return vec![first];
    }
    let span = (last - first) as usize;
    let stride = span.div_ceil(count.max(1)).max(1);
    (first..=last).step_by(stride).collect()
}

/// Line chart of one variable over the years
#[component]
pub fn TimeSeriesChart(
    series: TimeSeries,
    #[prop(into)] title: String,
    #[prop(into)] y_title: String,
    #[prop(optional)] config: Option<TimeSeriesConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let dims = ChartDimensions::new(config.width, config.height).with_margin(config.margin);
    let inner_w = dims.inner_width();
    let inner_h = dims.inner_height();

    let (first_year, last_year) = series.year_range().unwrap_or((0, 0));
    let (v_min, v_max) = series.value_range().unwrap_or((0.0, 1.0));

    let x_scale = LinearScale::new()
        .padded_domain(first_year as f64, last_year as f64, 0.03)
        .range(0.0, inner_w);
    let y_scale = LinearScale::new()
        .padded_domain(v_min, v_max, 0.1)
        .range(inner_h, 0.0);

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| (x_scale.scale(p.year as f64), y_scale.scale(p.value)))
        .collect();
    let path = line_path(&points);

    let markers = points.iter().map(|&(cx, cy)| {
        view! { <circle cx=cx cy=cy r=config.marker_radius fill=colors::SERIES_MARKER /> }
    }).collect_view();

    let x_ticks = year_ticks(first_year, last_year, 8).into_iter().map(|year| {
        let x = x_scale.scale(year as f64);
        view! {
            <g transform=format!("translate({:.2}, {:.2})", x, inner_h)>
                <line y1={-inner_h} y2="0" stroke=colors::GRID stroke-width="1" />
                <line y1="0" y2="6" stroke=colors::AXIS stroke-width="2" />
                <text
                    y="9"
                    dy="0.71em"
                    text-anchor="middle"
                    font-size=config.tick_font
                    fill=colors::AXIS
                >
                    {year.to_string()}
                </text>
            </g>
        }
    }).collect_view();

    view! {
        <svg
            class="time-series-chart"
            viewBox=dims.viewbox()
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: 100%;"
        >
            <rect width=dims.width height=dims.height fill=colors::BG_PLOT />

            <ChartTitle
                text=title
                x={dims.width / 2.0}
                y={dims.margin.top / 2.0 + config.title_font / 3.0}
                font_size=config.title_font
            />

            <g transform=dims.inner_transform()>
                <YAxis
                    scale=y_scale.clone()
                    width=inner_w
                    height=inner_h
                    title=y_title
                    tick_font=config.tick_font
                    title_font=config.axis_title_font
                />
                {x_ticks}
                <line x1="0" y1=inner_h x2=inner_w y2=inner_h stroke=colors::AXIS stroke-width="2" />
                <ZeroLine scale=y_scale.clone() width=inner_w />

                <path
                    class="series-line"
                    d=path
                    fill="none"
                    stroke=colors::SERIES_LINE
                    stroke-width=config.line_width
                    stroke-linecap="round"
                    stroke-linejoin="round"
                />
                {markers}

                <text
                    class="axis-title"
                    x={inner_w / 2.0}
                    y={inner_h + config.tick_font * 2.0 + 14.0}
                    text-anchor="middle"
                    font-size=config.axis_title_font
                    fill=colors::AXIS
                >
                    "Year"
                </text>
            </g>
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_ticks_cover_short_ranges() {
        assert_eq!(year_ticks(2010, 2014, 8), vec![2010, 2011, 2012, 2013, 2014]);
        assert_eq!(year_ticks(2020, 2020, 8), vec![2020]);
    }

    #[test]
    fn test_year_ticks_thin_long_ranges() {
        let ticks = year_ticks(1990, 2020, 8);
        assert_eq!(ticks.first(), Some(&1990));
        assert!(ticks.len() <= 9);
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 4));
    }

    #[test]
    fn test_compact_preset() {
        let config = TimeSeriesConfig::for_viewport(768.0);
        assert_eq!(config.width, 400.0);
        assert_eq!(config.marker_radius, 3.0);
    }
}
