//! # flow
//!
//! Cumulative flow (waterfall) layout for the nitrogen budget.
//!
//! Works in data coordinates: x is a slot index starting at [`FIRST_SLOT`]
//! and advancing by [`SLOT_STEP`], y is cumulative flux. The SVG chart in
//! `waterfall` maps these through linear scales.
//!
//! The layout is a two-phase fold: every segment is computed first, then the
//! surplus checkpoint is located by category name. A budget without the
//! checkpoint is rejected with [`LayoutError::MissingCheckpoint`].

use nbudget_core::{
    FixedDecimalFormatter, FluxBudget, FluxDirection, FluxOrdering, FluxValue, LayoutError,
    SURPLUS_CHECKPOINT, ValueFormatter, category_color, category_label, colors,
};
use tracing::debug;

/// x position of the first segment
pub const FIRST_SLOT: f64 = 1.0;
/// Horizontal distance between segment slots
pub const SLOT_STEP: f64 = 0.5;
/// Value label offset above a rising segment's end
pub const RISE_LABEL_OFFSET: f64 = 2.0;
/// Value label offset below a falling segment's end
pub const FALL_LABEL_OFFSET: f64 = -6.0;

/// Y-axis title of the budget chart
pub const FLOW_AXIS_TITLE: &str = "Cumulative N flux [kt N2O-N yr⁻¹]";

// ============================================================================
// GEOMETRY
// ============================================================================

/// One category's step in the running balance
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSegment {
    pub category: String,
    pub label: String,
    pub color: &'static str,
    pub direction: FluxDirection,
    pub x: f64,
    pub start: f64,
    pub end: f64,
}

impl FlowSegment {
    pub fn delta(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_rising(&self) -> bool {
        self.delta() > 0.0
    }

    /// `|end - start|` to two decimals
    pub fn value_text(&self) -> String {
        FixedDecimalFormatter::default().format(self.delta().abs())
    }

    /// Where the value label sits
    pub fn value_label_y(&self) -> f64 {
        if self.is_rising() {
            self.end + RISE_LABEL_OFFSET
        } else {
            self.end + FALL_LABEL_OFFSET
        }
    }

    /// Horizontal guide at the segment end, spanning one slot
    pub fn guide(&self, step: f64) -> GuideLine {
        GuideLine {
            x0: self.x,
            x1: self.x + step,
            y: self.end,
            color: self.color,
            dashed: false,
        }
    }

    pub fn arrow(&self) -> Arrow {
        Arrow {
            x: self.x,
            tail: self.start,
            head: self.end,
            color: self.color,
        }
    }
}

/// Summary quantities of a folded budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Running sum right after the checkpoint category
    pub surplus: f64,
    /// Running sum after the last category
    pub delta_n: f64,
    /// `delta_n - surplus`
    pub loss: f64,
}

/// Vertical arrow from `tail` to `head` at `x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub x: f64,
    pub tail: f64,
    pub head: f64,
    pub color: &'static str,
}

/// Horizontal line at `y` from `x0` to `x1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
    pub color: &'static str,
    pub dashed: bool,
}

/// Annotation text; `lines` are stacked, the chart rotates them -90°
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationLabel {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}

impl AnnotationLabel {
    fn titled(x: f64, y: f64, title: &str, value: f64) -> Self {
        Self {
            x,
            y,
            lines: vec![title.to_string(), FixedDecimalFormatter::default().format(value)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub x: f64,
    pub label: String,
}

/// An annotated quantity: arrow plus its rotated label
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub arrow: Arrow,
    pub label: AnnotationLabel,
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    pub segments: Vec<FlowSegment>,
    pub metrics: DerivedMetrics,
    pub step: f64,
    pub surplus: Annotation,
    pub delta_n: Annotation,
    pub loss: Annotation,
    /// Dashed line at the surplus level from after the checkpoint to the ΔN slot
    pub loss_guide: GuideLine,
    pub ticks: Vec<AxisTick>,
}

impl FlowLayout {
    /// Lay out a backend budget using `ordering`, reading `column` from
    /// per-column flux entries. Categories without a value count as 0, but the
    /// checkpoint key must be present in the output mapping.
    pub fn compute(
        budget: &FluxBudget,
        ordering: &FluxOrdering,
        column: &str,
    ) -> Result<Self, LayoutError> {
        if !budget.contains(FluxDirection::Output, SURPLUS_CHECKPOINT) {
            return Err(LayoutError::MissingCheckpoint {
                category: SURPLUS_CHECKPOINT.to_string(),
            });
        }
        Self::from_values(&ordering.resolve(budget, column))
    }

    /// Lay out already-ordered flux values
    pub fn from_values(values: &[FluxValue]) -> Result<Self, LayoutError> {
        if values.is_empty() {
            return Err(LayoutError::EmptyOrdering);
        }

        // Phase 1: fold the running sum into segments
        let mut running = 0.0;
        let segments: Vec<FlowSegment> = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let start = running;
                running = start + value.signed();
                FlowSegment {
                    category: value.category.clone(),
                    label: category_label(&value.category).to_string(),
                    color: category_color(&value.category),
                    direction: value.direction,
                    x: FIRST_SLOT + i as f64 * SLOT_STEP,
                    start,
                    end: running,
                }
            })
            .collect();

        // Phase 2: locate the checkpoint
        let checkpoint = segments
            .iter()
            .find(|s| s.direction == FluxDirection::Output && s.category == SURPLUS_CHECKPOINT)
            .ok_or_else(|| LayoutError::MissingCheckpoint {
                category: SURPLUS_CHECKPOINT.to_string(),
            })?;

        let step = SLOT_STEP;
        let surplus = checkpoint.end;
        let delta_n = running;
        let metrics = DerivedMetrics {
            surplus,
            delta_n,
            loss: delta_n - surplus,
        };

        let last_x = segments.last().map_or(FIRST_SLOT, |s| s.x);
        let x_dn = last_x + step;
        let surplus_x = checkpoint.x + 0.6 * step;
        let loss_x = last_x + step / 2.0;

        let surplus_annotation = Annotation {
            arrow: Arrow {
                x: surplus_x,
                tail: 0.0,
                head: surplus,
                color: colors::ANNOTATION,
            },
            label: AnnotationLabel::titled(surplus_x - 0.15, surplus / 2.0, "N surplus", surplus),
        };
        let delta_annotation = Annotation {
            arrow: Arrow {
                x: x_dn,
                tail: 0.0,
                head: delta_n,
                color: colors::ANNOTATION,
            },
            label: AnnotationLabel::titled(x_dn + 0.2, delta_n / 2.0, "ΔN", delta_n),
        };
        let loss_annotation = Annotation {
            arrow: Arrow {
                x: loss_x,
                tail: delta_n,
                head: surplus,
                color: colors::ANNOTATION,
            },
            label: AnnotationLabel::titled(
                loss_x - 0.15,
                delta_n + (surplus - delta_n) / 2.0,
                "N loss",
                metrics.loss,
            ),
        };
        let loss_guide = GuideLine {
            x0: checkpoint.x + step,
            x1: x_dn,
            y: surplus,
            color: colors::HARVEST,
            dashed: true,
        };

        let ticks = segments
            .iter()
            .map(|s| AxisTick {
                x: s.x,
                label: s.label.clone(),
            })
            .chain(std::iter::once(AxisTick {
                x: x_dn,
                label: String::new(),
            }))
            .collect();

        debug!(
            segments = segments.len(),
            surplus, delta_n, "flow layout computed"
        );

        Ok(Self {
            segments,
            metrics,
            step,
            surplus: surplus_annotation,
            delta_n: delta_annotation,
            loss: loss_annotation,
            loss_guide,
            ticks,
        })
    }

    /// x range covering every slot plus half a step either side
    pub fn x_extent(&self) -> (f64, f64) {
        let last = self.ticks.last().map_or(FIRST_SLOT, |t| t.x);
        (FIRST_SLOT - self.step, last + self.step)
    }

    /// y range covering zero, every segment and every value label
    pub fn y_extent(&self) -> (f64, f64) {
        self.segments
            .iter()
            .flat_map(|s| [s.start, s.end, s.value_label_y()])
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
