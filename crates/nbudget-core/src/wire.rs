//! Backend row shapes: per-region totals and per-year series

use crate::{AdminLevel, DashError, RegionKey, Result, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One JSON object row as returned by `/totals` and `/chart-data`
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

fn number(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

// ============================================================================
// REGION VALUES
// ============================================================================

/// Choropleth values keyed by region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionValues {
    values: BTreeMap<RegionKey, f64>,
}

impl RegionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: RegionKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Value for a region; regions without data count as 0
    pub fn value_for(&self, key: &RegionKey) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn get(&self, key: &RegionKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Observations fed to colour binning
    pub fn observations(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from `/totals` rows.
    ///
    /// A row is keyed by the level's GeoJSON property, falling back to a
    /// column named after the level itself when the property is absent, null
    /// or blank. Rows without a key or a numeric value are skipped.
    pub fn from_totals(rows: &[JsonRow], level: AdminLevel, variable: Variable) -> Self {
        let column_key = |row: &JsonRow, column: &str| {
            row.get(column)
                .and_then(RegionKey::from_json)
                .filter(|key| !key.as_str().is_empty())
        };
        let mut out = Self::new();
        for row in rows {
            let key = column_key(row, level.property_key())
                .or_else(|| column_key(row, level.as_str()));
            let value = row.get(variable.as_str()).and_then(number);
            if let (Some(key), Some(value)) = (key, value) {
                out.insert(key, value);
            }
        }
        out
    }

    /// Build from the `/all_n_surplus` mapping; null entries are skipped
    pub fn from_surplus(map: &BTreeMap<String, Option<f64>>) -> Self {
        Self {
            values: map
                .iter()
                .filter_map(|(k, v)| {
                    v.filter(|v| v.is_finite())
                        .map(|v| (RegionKey::new(k.clone()), v))
                })
                .collect(),
        }
    }
}

// ============================================================================
// TIME SERIES
// ============================================================================

/// One point of a yearly series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Yearly values of a variable for one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Build from `/chart-data` rows, sorted by year.
    /// Fails when a row has no parseable year.
    pub fn from_rows(rows: &[JsonRow], variable: Variable) -> Result<Self> {
        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let year = row
                .get("year")
                .and_then(number)
                .ok_or_else(|| DashError::data("series row without a year"))?;
            let Some(value) = row.get(variable.as_str()).and_then(number) else {
                continue;
            };
            points.push(SeriesPoint {
                year: year.round() as i32,
                value,
            });
        }
        points.sort_by_key(|p| p.year);
        Ok(Self { points })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.year, last.year)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<JsonRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_totals_keyed_by_property_or_level() {
        let rows = rows(
            r#"[
                {"NAME_2": "Aarhus", "N2O": 12.5},
                {"kommune": "Odense", "N2O": 3},
                {"N2O": 7.0},
                {"NAME_2": "Vejle", "N2O": null}
            ]"#,
        );
        let values = RegionValues::from_totals(&rows, AdminLevel::Kommune, Variable::N2O);

        assert_eq!(values.len(), 2);
        assert_eq!(values.get(&RegionKey::new("Aarhus")), Some(12.5));
        assert_eq!(values.get(&RegionKey::new("Odense")), Some(3.0));
        assert_eq!(values.value_for(&RegionKey::new("Vejle")), 0.0);
    }

    #[test]
    fn test_null_or_blank_property_falls_back_to_level_column() {
        let rows = rows(
            r#"[
                {"NAME_2": null, "kommune": "Odense", "N2O": 3},
                {"NAME_2": "", "kommune": "Vejle", "N2O": 4.5},
                {"NAME_2": null, "N2O": 9.0}
            ]"#,
        );
        let values = RegionValues::from_totals(&rows, AdminLevel::Kommune, Variable::N2O);

        assert_eq!(values.len(), 2);
        assert_eq!(values.get(&RegionKey::new("Odense")), Some(3.0));
        assert_eq!(values.get(&RegionKey::new("Vejle")), Some(4.5));
    }

    #[test]
    fn test_national_totals_row() {
        let rows = rows(r#"[{"national": "Denmark", "Fert": 210.4}]"#);
        let values = RegionValues::from_totals(&rows, AdminLevel::National, Variable::Fert);
        assert_eq!(values.get(&RegionKey::new("Denmark")), Some(210.4));
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let rows = rows(r#"[{"ogc_fid": 17, "NO3": 1.5}]"#);
        let values = RegionValues::from_totals(&rows, AdminLevel::Treparter, Variable::NO3);
        assert_eq!(values.get(&RegionKey::new("17")), Some(1.5));
    }

    #[test]
    fn test_surplus_map() {
        let map: BTreeMap<String, Option<f64>> =
            serde_json::from_str(r#"{"Aarhus": 45.2, "Odense": null}"#).unwrap();
        let values = RegionValues::from_surplus(&map);
        assert_eq!(values.observations(), vec![45.2]);
        assert_eq!(values.get(&RegionKey::new("Odense")), None);
    }

    #[test]
    fn test_series_sorted_by_year() {
        let rows = rows(
            r#"[
                {"year": 2012, "NH3": 4.0},
                {"year": 2010, "NH3": 2.0},
                {"year": "2011", "NH3": 3.0}
            ]"#,
        );
        let series = TimeSeries::from_rows(&rows, Variable::NH3).unwrap();
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2011, 2012]);
        assert_eq!(series.value_range(), Some((2.0, 4.0)));
        assert_eq!(series.year_range(), Some((2010, 2012)));
    }

    #[test]
    fn test_series_row_without_year_fails() {
        let rows = rows(r#"[{"NH3": 4.0}]"#);
        assert!(TimeSeries::from_rows(&rows, Variable::NH3).is_err());
    }
}
