//! Error types for the dashboard core.
//!
//! Each stage has its own `thiserror` enum; `DashError` unifies them for
//! callers that only need to surface a message.

use thiserror::Error;

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashError>;

/// Waterfall layout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The category that defines the N surplus never appeared in the sequence.
    #[error("missing required checkpoint category: {category}")]
    MissingCheckpoint { category: String },

    /// Nothing to lay out.
    #[error("flux ordering is empty")]
    EmptyOrdering,
}

/// Colour binning failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("cannot bin an empty dataset")]
    EmptyDataset,

    #[error("bin count must be at least 1")]
    ZeroBins,
}

/// Feature search failures (user input).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a search value.")]
    EmptyQuery,

    #[error("Map layer not loaded yet.")]
    NotLoaded,

    #[error("No matching feature found for \"{query}\" in {level}.")]
    NoMatch { query: String, level: String },
}

/// Errors that can occur anywhere in the dashboard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// Backend payload did not have the expected shape.
    #[error("Unexpected data: {0}")]
    Data(String),

    /// Transport / HTTP failure, already rendered to text.
    #[error("{0}")]
    Fetch(String),
}

impl DashError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Whether the error came from user input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}
