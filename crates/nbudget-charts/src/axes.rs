//! Shared axis and grid components for the popup charts

use crate::{
    chartkit::{LinearScale, Scale, format_axis_value},
    colors,
};
use leptos::prelude::*;

/// Left y-axis with nice ticks, horizontal grid lines and a rotated title
#[component]
pub fn YAxis(
    scale: LinearScale,
    width: f64,
    height: f64,
    #[prop(into)] title: String,
    #[prop(default = 12.0)] tick_font: f64,
    #[prop(default = 14.0)] title_font: f64,
    #[prop(default = 6)] tick_count: usize,
) -> impl IntoView {
    let ticks = scale.nice_ticks(tick_count);
    let title_x = -(tick_font * 3.5 + 8.0);
    let title_y = height / 2.0;

    view! {
        <g class="y-axis">
            {ticks.into_iter().map(|tick| {
                let y = scale.scale(tick);
                view! {
                    <g transform=format!("translate(0, {:.2})", y)>
                        <line x1="0" x2=width stroke=colors::GRID stroke-width="1" />
                        <line x1="-6" x2="0" stroke=colors::AXIS stroke-width="2" />
                        <text
                            x="-9"
                            dy="0.32em"
                            text-anchor="end"
                            font-size=tick_font
                            fill=colors::AXIS
                        >
                            {format_axis_value(tick)}
                        </text>
                    </g>
                }
            }).collect_view()}

            <line x1="0" y1="0" x2="0" y2=height stroke=colors::AXIS stroke-width="2" />

            <text
                class="axis-title"
                x=title_x
                y=title_y
                transform=format!("rotate(-90 {:.2} {:.2})", title_x, title_y)
                text-anchor="middle"
                font-size=title_font
                fill=colors::AXIS
            >
                {title}
            </text>
        </g>
    }
}

/// Thin black zero line, drawn when 0 lies inside the y domain
#[component]
pub fn ZeroLine(scale: LinearScale, width: f64) -> impl IntoView {
    let (lo, hi) = scale.domain_bounds();
    (lo <= 0.0 && hi >= 0.0).then(|| {
        let y = scale.scale(0.0);
        view! {
            <line x1="0" y1=y x2=width y2=y stroke=colors::AXIS stroke-width="1" />
        }
    })
}

/// Centred chart title above the plot area
#[component]
pub fn ChartTitle(
    #[prop(into)] text: String,
    x: f64,
    y: f64,
    #[prop(default = 18.0)] font_size: f64,
) -> impl IntoView {
    view! {
        <text
            class="chart-title"
            x=x
            y=y
            text-anchor="middle"
            font-size=font_size
            fill=colors::ANNOTATION
        >
            {text}
        </text>
    }
}
