//! Reactive choropleth state: loaded layer, palette, highlight and zoom

use crate::Filters;
use leptos::prelude::*;
use nbudget_charts::{Palette, PaletteConfig};
use nbudget_core::{
    Bounds, PaletteError, RegionFeature, RegionKey, RegionLayer, RegionValues, Rgb, SearchError,
};

/// How long a searched region stays highlighted (ms)
pub const HIGHLIGHT_MS: u32 = 3_000;

/// A fully prepared choropleth: geometry, values and their palette
#[derive(Debug, Clone)]
pub struct LoadedLayer {
    pub layer: RegionLayer,
    pub values: RegionValues,
    pub palette: Palette,
    pub filters: Filters,
}

impl LoadedLayer {
    /// Bin `values` into a palette. Without any observation the placeholder
    /// palette is kept so the geometry still renders.
    pub fn build(layer: RegionLayer, values: RegionValues, filters: Filters) -> Self {
        let palette = match Palette::from_values(&values.observations(), PaletteConfig::default()) {
            Ok(palette) => palette,
            Err(PaletteError::EmptyDataset) => {
                tracing::warn!(level = filters.level.as_str(), "no values to bin, using placeholder palette");
                Palette::placeholder()
            }
            Err(err) => {
                tracing::warn!("palette fallback: {}", err);
                Palette::placeholder()
            }
        };
        Self {
            layer,
            values,
            palette,
            filters,
        }
    }

    /// Fill colour for a region; regions without data are coloured as 0
    pub fn fill_for(&self, key: &RegionKey) -> Rgb {
        self.palette.color_for(self.values.value_for(key))
    }
}

/// Resolve a search query against the loaded layer
pub fn search_layer<'a>(
    layer: Option<&'a RegionLayer>,
    query: &str,
) -> Result<&'a RegionFeature, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let layer = layer.ok_or(SearchError::NotLoaded)?;
    layer.find(query).ok_or_else(|| SearchError::NoMatch {
        query: query.to_string(),
        level: layer.level.label().to_string(),
    })
}

/// Reactive map state
#[derive(Clone, Copy)]
pub struct MapState {
    pub loaded: RwSignal<Option<LoadedLayer>>,
    /// Region drawn with the highlight stroke
    pub highlight: RwSignal<Option<RegionKey>>,
    /// Zoom target; `None` shows the whole layer
    pub focus: RwSignal<Option<Bounds>>,
}

impl MapState {
    pub fn new() -> Self {
        Self {
            loaded: RwSignal::new(None),
            highlight: RwSignal::new(None),
            focus: RwSignal::new(None),
        }
    }

    /// Replace the choropleth wholesale
    pub fn install(&self, loaded: LoadedLayer) {
        tracing::info!(
            level = loaded.filters.level.as_str(),
            view = loaded.filters.view.as_str(),
            regions = loaded.layer.len(),
            "map layer installed"
        );
        self.highlight.set(None);
        self.focus.set(None);
        self.loaded.set(Some(loaded));
    }

    /// Palette for the legend; placeholder until a layer is loaded
    pub fn palette(&self) -> Signal<Palette> {
        let loaded = self.loaded;
        Signal::derive(move || {
            loaded.with(|l| l.as_ref().map(|l| l.palette.clone()).unwrap_or_default())
        })
    }

    /// Find a region by name in the loaded layer and focus it
    pub fn search(&self, query: &str) -> Result<RegionKey, SearchError> {
        self.loaded.with_untracked(|loaded| {
            let feature = search_layer(loaded.as_ref().map(|l| &l.layer), query)?;
            self.focus.set(feature.bounds);
            self.highlight.set(Some(feature.key.clone()));
            Ok(feature.key.clone())
        })
    }

    /// Drop the highlight if it still points at `key`
    pub fn clear_highlight(&self, key: &RegionKey) {
        if self.highlight.get_untracked().as_ref() == Some(key) {
            self.highlight.set(None);
        }
    }

    pub fn reset_zoom(&self) {
        self.focus.set(None);
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}
