//! Nitrogen budget (waterfall) chart component
//!
//! Renders a [`FlowLayout`] as arrows between cumulative levels, with the
//! N surplus, ΔN and N loss annotations.

use crate::{
    ChartDimensions, ChartMargin,
    axes::{ChartTitle, YAxis, ZeroLine},
    chartkit::{LinearScale, Scale, arrow_head_path},
    colors,
    flow::{Annotation, AnnotationLabel, Arrow, FLOW_AXIS_TITLE, FlowLayout, GuideLine},
};
use leptos::prelude::*;

/// Waterfall chart configuration
#[derive(Debug, Clone)]
pub struct WaterfallConfig {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
    pub arrow_width: f64,
    pub title_font: f64,
    pub axis_title_font: f64,
    pub tick_font: f64,
    pub label_font: f64,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 420.0,
            margin: ChartMargin::standard(),
            arrow_width: 3.5,
            title_font: 18.0,
            axis_title_font: 14.0,
            tick_font: 12.0,
            label_font: 12.0,
        }
    }
}

impl WaterfallConfig {
    /// Small-screen preset
    pub fn compact() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: ChartMargin::compact(),
            arrow_width: 2.0,
            title_font: 10.0,
            axis_title_font: 10.0,
            tick_font: 8.0,
            label_font: 8.0,
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

/// Scales mapping layout coordinates into the inner plot area
#[derive(Clone)]
struct FlowScales {
    x: LinearScale,
    y: LinearScale,
}

impl FlowScales {
    fn new(layout: &FlowLayout, dims: &ChartDimensions) -> Self {
        let (x0, x1) = layout.x_extent();
        let (y0, y1) = layout.y_extent();
        Self {
            x: LinearScale::new().domain(x0, x1).range(0.0, dims.inner_width()),
            y: LinearScale::new()
                .padded_domain(y0, y1, 0.05)
                .range(dims.inner_height(), 0.0),
        }
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x.scale(x), self.y.scale(y))
    }
}

/// Nitrogen budget chart
#[component]
pub fn NitrogenBudgetChart(
    layout: FlowLayout,
    #[prop(into)] title: String,
    #[prop(optional)] config: Option<WaterfallConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let dims = ChartDimensions::new(config.width, config.height).with_margin(config.margin);
    let scales = FlowScales::new(&layout, &dims);
    let inner_w = dims.inner_width();
    let inner_h = dims.inner_height();

    let segments = layout.segments.iter().map(|segment| {
        let guide = guide_view(&segment.guide(layout.step), &scales, 2.0, 0.5);
        let arrow = arrow_view(&segment.arrow(), &scales, config.arrow_width);
        let (lx, ly) = scales.point(segment.x, segment.value_label_y());
        view! {
            <g class="flow-segment" data-category=segment.category.clone()>
                {guide}
                {arrow}
                <text
                    x=lx
                    y=ly
                    text-anchor="middle"
                    font-size=config.label_font
                    fill=segment.color
                >
                    {segment.value_text()}
                </text>
            </g>
        }
    }).collect_view();

    let annotations = [&layout.surplus, &layout.delta_n, &layout.loss]
        .into_iter()
        .map(|annotation| annotation_view(annotation, &scales, config.arrow_width, config.label_font))
        .collect_view();

    let loss_guide = guide_view(&layout.loss_guide, &scales, 2.0, 1.0);

    let x_ticks = layout.ticks.iter().map(|tick| {
        let x = scales.x.scale(tick.x);
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
                    {tick.label.clone()}
                </text>
            </g>
        }
    }).collect_view();

    view! {
        <svg
            class="nitrogen-budget-chart"
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
                    scale=scales.y.clone()
                    width=inner_w
                    height=inner_h
                    title=FLOW_AXIS_TITLE
                    tick_font=config.tick_font
                    title_font=config.axis_title_font
                />
                {x_ticks}
                <line x1="0" y1=inner_h x2=inner_w y2=inner_h stroke=colors::AXIS stroke-width="2" />
                <ZeroLine scale=scales.y.clone() width=inner_w />

                {segments}
                {loss_guide}
                {annotations}
            </g>
        </svg>
    }
}

fn guide_view(
    line: &GuideLine,
    scales: &FlowScales,
    width: f64,
    opacity: f64,
) -> impl IntoView + use<> {
    let (x1, y) = scales.point(line.x0, line.y);
    let x2 = scales.x.scale(line.x1);
    let dash = line.dashed.then_some("6,4");
    view! {
        <line
            x1=x1
            y1=y
            x2=x2
            y2=y
            stroke=line.color
            stroke-width=width
            stroke-dasharray=dash
            opacity=opacity
        />
    }
}

fn arrow_view(arrow: &Arrow, scales: &FlowScales, width: f64) -> impl IntoView + use<> {
    let color = arrow.color;
    let (x, tail) = scales.point(arrow.x, arrow.tail);
    let head = scales.y.scale(arrow.head);
    let head_size = width * 1.5;

    // Zero-length arrows draw nothing
    ((tail - head).abs() > f64::EPSILON).then(|| {
        // Shaft stops at the base of the head
        let dir = if head < tail { 1.0 } else { -1.0 };
        let shaft_end = head + dir * head_size * 1.5;
        view! {
            <g class="flow-arrow">
                <line
                    x1=x
                    y1=tail
                    x2=x
                    y2=shaft_end
                    stroke=color
                    stroke-width=width
                />
                <path d=arrow_head_path(x, tail, head, head_size) fill=color />
            </g>
        }
    })
}

fn annotation_view(
    annotation: &Annotation,
    scales: &FlowScales,
    arrow_width: f64,
    font_size: f64,
) -> impl IntoView + use<> {
    view! {
        <g class="flow-annotation">
            {arrow_view(&annotation.arrow, scales, arrow_width)}
            {rotated_label(&annotation.label, scales, font_size)}
        </g>
    }
}

fn rotated_label(
    label: &AnnotationLabel,
    scales: &FlowScales,
    font_size: f64,
) -> impl IntoView + use<> {
    let (x, y) = scales.point(label.x, label.y);
    let count = label.lines.len();
    let lines = label.lines.iter().enumerate().map(|(i, line)| {
        // Centre the stack of lines on the anchor
        let dy = if i == 0 {
            format!("{:.2}em", -0.6 * (count.saturating_sub(1)) as f64)
        } else {
            "1.2em".to_string()
        };
        view! { <tspan x=x dy=dy>{line.clone()}</tspan> }
    }).collect_view();

    view! {
        <text
            x=x
            y=y
            transform=format!("rotate(-90 {:.2} {:.2})", x, y)
            text-anchor="middle"
            font-size=font_size
            fill=colors::ANNOTATION
        >
            {lines}
        </text>
    }
}
