//! Nitrogen flux types for the budget (waterfall) view

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column selected when a flux entry is broken down by year
pub const AVERAGE_COLUMN: &str = "average";

/// Input categories in plotting order
pub const INPUT_CATEGORIES: &[&str] = &["Fert", "Dep", "BNF"];
/// Output categories in plotting order (harvest first, then leaching, then emissions)
pub const OUTPUT_CATEGORIES: &[&str] = &["Harv", "NO3", "DON_NH4", "N2O", "NH3", "N2", "NO"];
/// Output category whose running sum defines the N surplus
pub const SURPLUS_CHECKPOINT: &str = "Harv";

/// Whether a flux adds to or removes from the running balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxDirection {
    Input,
    Output,
}

impl FluxDirection {
    /// Sign applied to the magnitude when folding
    pub fn sign(&self) -> f64 {
        match self {
            Self::Input => 1.0,
            Self::Output => -1.0,
        }
    }
}

/// A named nitrogen quantity with direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxValue {
    pub category: String,
    pub magnitude: f64,
    pub direction: FluxDirection,
}

impl FluxValue {
    pub fn input(category: impl Into<String>, magnitude: f64) -> Self {
        Self {
            category: category.into(),
            magnitude,
            direction: FluxDirection::Input,
        }
    }

    pub fn output(category: impl Into<String>, magnitude: f64) -> Self {
        Self {
            category: category.into(),
            magnitude,
            direction: FluxDirection::Output,
        }
    }

    /// Signed contribution to the running balance
    pub fn signed(&self) -> f64 {
        self.direction.sign() * self.magnitude
    }
}

/// A flux value as delivered by the backend: either a bare number or a
/// per-column breakdown such as `{"average": 12.3, "2019": 11.0}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FluxEntry {
    Scalar(f64),
    Columns(BTreeMap<String, Option<f64>>),
}

impl FluxEntry {
    pub fn value(&self, column: &str) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Columns(cols) => cols.get(column).copied().flatten(),
        }
    }
}

/// Category → flux entry mapping for one direction
pub type FluxMap = BTreeMap<String, Option<FluxEntry>>;

/// `/full-n-chart-data` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FluxBudget {
    #[serde(default)]
    pub input: FluxMap,
    #[serde(default)]
    pub output: FluxMap,
}

impl FluxBudget {
    /// Build from plain (category, magnitude) pairs
    pub fn from_pairs(input: &[(&str, f64)], output: &[(&str, f64)]) -> Self {
        let to_map = |pairs: &[(&str, f64)]| -> FluxMap {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Some(FluxEntry::Scalar(*v))))
                .collect()
        };
        Self {
            input: to_map(input),
            output: to_map(output),
        }
    }

    fn map(&self, direction: FluxDirection) -> &FluxMap {
        match direction {
            FluxDirection::Input => &self.input,
            FluxDirection::Output => &self.output,
        }
    }

    /// Magnitude for a category in the given column, `None` when absent or null
    pub fn lookup(&self, direction: FluxDirection, category: &str, column: &str) -> Option<f64> {
        self.map(direction)
            .get(category)
            .and_then(|e| e.as_ref())
            .and_then(|e| e.value(column))
            .filter(|v| v.is_finite())
    }

    /// Whether the category key exists in the given direction's mapping
    pub fn contains(&self, direction: FluxDirection, category: &str) -> bool {
        self.map(direction).contains_key(category)
    }

    /// Both mappings empty (backend returned no data)
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }
}

/// Fixed ordering of categories folded by the waterfall layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxOrdering {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl FluxOrdering {
    pub fn new<I, O, S, T>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Inputs then outputs, tagged with direction
    pub fn iter(&self) -> impl Iterator<Item = (&str, FluxDirection)> {
        self.inputs
            .iter()
            .map(|c| (c.as_str(), FluxDirection::Input))
            .chain(self.outputs.iter().map(|c| (c.as_str(), FluxDirection::Output)))
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the budget into ordered flux values, missing magnitudes as 0
    pub fn resolve(&self, budget: &FluxBudget, column: &str) -> Vec<FluxValue> {
        self.iter()
            .map(|(category, direction)| FluxValue {
                category: category.to_string(),
                magnitude: budget.lookup(direction, category, column).unwrap_or(0.0),
                direction,
            })
            .collect()
    }
}

impl Default for FluxOrdering {
    fn default() -> Self {
        Self::new(INPUT_CATEGORIES.iter().copied(), OUTPUT_CATEGORIES.iter().copied())
    }
}

// ============================================================================
// CATEGORY LOOKUPS
// ============================================================================

/// Colour class for a flux category; unknown categories are neutral gray
pub fn category_color(category: &str) -> &'static str {
    use crate::colors;
    match category {
        "Fert" | "Dep" | "BNF" => colors::INPUT,
        "Harv" => colors::HARVEST,
        "NO3" | "DON_NH4" => colors::LEACHING,
        "N2O" | "NH3" | "N2" | "NO" => colors::EMISSION,
        _ => colors::NEUTRAL,
    }
}

/// Short display label for a flux category; unknown categories keep their name
pub fn category_label(category: &str) -> &str {
    match category {
        "NO3" => "NO₃",
        "DON_NH4" => "DON+NH₄",
        "N2O" => "N₂O",
        "NH3" => "NH₃",
        "N2" => "N₂",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flux_entry_decoding() {
        let json = r#"{
            "input": {"Fert": 100.0, "Dep": {"average": 20.0, "2019": 18.0}, "BNF": null},
            "output": {"Harv": 80}
        }"#;
        let budget: FluxBudget = serde_json::from_str(json).unwrap();

        assert_eq!(budget.lookup(FluxDirection::Input, "Fert", AVERAGE_COLUMN), Some(100.0));
        assert_eq!(budget.lookup(FluxDirection::Input, "Dep", AVERAGE_COLUMN), Some(20.0));
        assert_eq!(budget.lookup(FluxDirection::Input, "Dep", "2019"), Some(18.0));
        assert_eq!(budget.lookup(FluxDirection::Input, "BNF", AVERAGE_COLUMN), None);
        assert!(budget.contains(FluxDirection::Input, "BNF"));
        assert_eq!(budget.lookup(FluxDirection::Output, "Harv", AVERAGE_COLUMN), Some(80.0));
    }

    #[test]
    fn test_ordering_resolves_missing_as_zero() {
        let budget = FluxBudget::from_pairs(&[("Fert", 10.0)], &[("Harv", 4.0)]);
        let values = FluxOrdering::default().resolve(&budget, AVERAGE_COLUMN);

        assert_eq!(values.len(), 10);
        assert_eq!(values[0], FluxValue::input("Fert", 10.0));
        assert_eq!(values[1], FluxValue::input("Dep", 0.0));
        assert_eq!(values[3], FluxValue::output("Harv", 4.0));
        assert!(values[4..].iter().all(|v| v.magnitude == 0.0));
    }

    #[test]
    fn test_signed_contribution() {
        assert_eq!(FluxValue::input("Fert", 3.0).signed(), 3.0);
        assert_eq!(FluxValue::output("NO3", 3.0).signed(), -3.0);
    }

    #[test]
    fn test_category_lookups_fall_back() {
        assert_eq!(category_color("Harv"), "green");
        assert_eq!(category_color("CH4"), "gray");
        assert_eq!(category_label("DON_NH4"), "DON+NH₄");
        assert_eq!(category_label("CH4"), "CH4");
    }
}
