//! GeoJSON region model and the region-selection capability

use crate::{AdminLevel, RegionKey};
use serde::{Deserialize, Serialize};

/// Key used for features that lack the level's property
pub const UNKNOWN_REGION: &str = "Unknown";

// ============================================================================
// GEOJSON WIRE TYPES
// ============================================================================

/// `[lon, lat]` or `[lon, lat, alt]`
pub type Position = Vec<f64>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    /// Points, lines and collections are not drawn on the choropleth
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Flatten into rings of `(lon, lat)` pairs (outer rings and holes alike)
    pub fn rings(&self) -> Vec<Vec<(f64, f64)>> {
        let ring = |r: &Vec<Position>| -> Vec<(f64, f64)> {
            r.iter()
                .filter(|p| p.len() >= 2)
                .map(|p| (p[0], p[1]))
                .collect()
        };
        match self {
            Self::Polygon { coordinates } => coordinates.iter().map(ring).collect(),
            Self::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().map(ring).collect()
            }
            Self::Unsupported => Vec::new(),
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Bounds of a point set, `None` when empty
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a (f64, f64)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let &(lon, lat) = iter.next()?;
        let mut b = Self {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        };
        for &(lon, lat) in iter {
            b.min_lon = b.min_lon.min(lon);
            b.min_lat = b.min_lat.min(lat);
            b.max_lon = b.max_lon.max(lon);
            b.max_lat = b.max_lat.max(lat);
        }
        Some(b)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

// ============================================================================
// REGION FEATURES
// ============================================================================

/// A drawable region keyed by its level-specific property
#[derive(Debug, Clone)]
pub struct RegionFeature {
    pub level: AdminLevel,
    pub key: RegionKey,
    pub rings: Vec<Vec<(f64, f64)>>,
    pub bounds: Option<Bounds>,
}

impl RegionFeature {
    pub fn from_feature(feature: &Feature, level: AdminLevel) -> Self {
        let key = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(level.property_key()))
            .and_then(RegionKey::from_json)
            .unwrap_or_else(|| RegionKey::new(UNKNOWN_REGION));
        let rings = feature
            .geometry
            .as_ref()
            .map(Geometry::rings)
            .unwrap_or_default();
        let bounds = Bounds::of_points(rings.iter().flatten());
        Self {
            level,
            key,
            rings,
            bounds,
        }
    }
}

/// All regions of one administrative level
#[derive(Debug, Clone)]
pub struct RegionLayer {
    pub level: AdminLevel,
    pub features: Vec<RegionFeature>,
}

impl RegionLayer {
    pub fn from_collection(collection: &FeatureCollection, level: AdminLevel) -> Self {
        Self {
            level,
            features: collection
                .features
                .iter()
                .map(|f| RegionFeature::from_feature(f, level))
                .collect(),
        }
    }

    /// Union of all feature bounds
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|f| f.bounds)
            .reduce(Bounds::union)
    }

    /// Case-insensitive exact match on the region key
    pub fn find(&self, query: &str) -> Option<&RegionFeature> {
        self.features.iter().find(|f| f.key.matches_query(query))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// ============================================================================
// SELECTION CAPABILITY
// ============================================================================

/// A map click resolved to a region
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionSelection {
    pub level: AdminLevel,
    pub key: RegionKey,
}

/// Something on the map that can be selected.
///
/// Decouples popup/data-fetch logic from how the map delivers clicks: the
/// map only wires the returned trigger to its own event source.
pub trait SelectableRegion {
    fn selection(&self) -> RegionSelection;

    /// Bind `handler` to this region; calling the returned trigger selects it
    fn on_select<F>(&self, handler: F) -> Box<dyn Fn() + Send + Sync>
    where
        F: Fn(RegionSelection) + Send + Sync + 'static,
    {
        let selection = self.selection();
        Box::new(move || handler(selection.clone()))
    }
}

impl SelectableRegion for RegionFeature {
    fn selection(&self) -> RegionSelection {
        RegionSelection {
            level: self.level,
            key: self.key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME_2": "Aarhus"},
             "geometry": {"type": "Polygon", "coordinates": [[[10.0, 56.0], [10.5, 56.0], [10.5, 56.3], [10.0, 56.0]]]}},
            {"type": "Feature", "properties": {"NAME_2": "Samsø"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[10.6, 55.8], [10.7, 55.8], [10.7, 55.9], [10.6, 55.8]]],
                [[[10.8, 55.7], [10.9, 55.7], [10.9, 55.75, 0.0], [10.8, 55.7]]]
             ]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [9.0, 55.0]}}
        ]
    }"#;

    fn layer() -> RegionLayer {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        RegionLayer::from_collection(&fc, AdminLevel::Kommune)
    }

    #[test]
    fn test_layer_from_collection() {
        let layer = layer();
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.features[0].key.as_str(), "Aarhus");
        assert_eq!(layer.features[1].rings.len(), 2);
        assert_eq!(layer.features[2].key.as_str(), UNKNOWN_REGION);
        assert!(layer.features[2].rings.is_empty());
        assert!(layer.features[2].bounds.is_none());
    }

    #[test]
    fn test_layer_bounds() {
        let b = layer().bounds().unwrap();
        assert_eq!(b.min_lon, 10.0);
        assert_eq!(b.max_lon, 10.9);
        assert_eq!(b.min_lat, 55.7);
        assert_eq!(b.max_lat, 56.3);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let layer = layer();
        assert_eq!(layer.find("aarhus").map(|f| f.key.as_str()), Some("Aarhus"));
        assert_eq!(layer.find("SAMSØ").map(|f| f.key.as_str()), Some("Samsø"));
        assert!(layer.find("Odense").is_none());
    }

    #[test]
    fn test_on_select_delivers_selection() {
        let layer = layer();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let trigger = layer.features[0].on_select(move |sel| sink.lock().unwrap().push(sel));

        trigger();
        trigger();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].key, RegionKey::new("Aarhus"));
        assert_eq!(seen[0].level, AdminLevel::Kommune);
    }
}
