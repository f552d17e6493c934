//! # nbudget-http
//!
//! HTTP access to the dashboard backend: endpoint description, bounded
//! timeouts and request generation tickets so only the latest response of a
//! channel is applied.

pub mod client;

pub use client::*;

use nbudget_core::{AdminLevel, DashError, LandUse, Variable};
use thiserror::Error;

/// Same-origin backend
pub const DEFAULT_BASE_URL: &str = "";

/// Default request timeout (ms)
pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("Could not read server response: {0}")]
    Decode(String),

    #[error("Request timed out after {millis} ms")]
    Timeout { millis: u32 },

    /// A newer request on the same channel superseded this one
    #[error("Response superseded by a newer request")]
    Stale,
}

impl From<ApiError> for DashError {
    fn from(err: ApiError) -> Self {
        DashError::Fetch(err.to_string())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Backend client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Absolute (or same-origin relative) URL for an endpoint path
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

// ============================================================================
// ENDPOINTS
// ============================================================================

/// Backend endpoints consumed by the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /geojson/{level}`
    GeoJson { level: AdminLevel },
    /// `GET /totals`
    Totals { level: AdminLevel, variable: Variable },
    /// `GET /all_n_surplus`
    AllNSurplus { level: AdminLevel, landuse: LandUse },
    /// `GET /chart-data`
    ChartData {
        level: AdminLevel,
        name: String,
        variable: Variable,
        landuse: LandUse,
    },
    /// `GET /full-n-chart-data`
    FullNChartData {
        level: AdminLevel,
        name: String,
        landuse: LandUse,
    },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::GeoJson { level } => format!("/geojson/{}", level.as_str()),
            Self::Totals { .. } => "/totals".to_string(),
            Self::AllNSurplus { .. } => "/all_n_surplus".to_string(),
            Self::ChartData { .. } => "/chart-data".to_string(),
            Self::FullNChartData { .. } => "/full-n-chart-data".to_string(),
        }
    }

    /// Query parameters in the order the backend documents them.
    /// Values are raw; encoding happens when the request is built.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::GeoJson { .. } => vec![],
            Self::Totals { level, variable } => vec![
                ("level", level.as_str().to_string()),
                ("variable", variable.as_str().to_string()),
            ],
            Self::AllNSurplus { level, landuse } => vec![
                ("level", level.as_str().to_string()),
                ("landuse", landuse.as_str().to_string()),
            ],
            Self::ChartData {
                level,
                name,
                variable,
                landuse,
            } => vec![
                ("level", level.as_str().to_string()),
                ("name", name.clone()),
                ("variable", variable.as_str().to_string()),
                ("landuse", landuse.as_str().to_string()),
            ],
            Self::FullNChartData {
                level,
                name,
                landuse,
            } => vec![
                ("level", level.as_str().to_string()),
                ("name", name.clone()),
                ("landuse", landuse.as_str().to_string()),
            ],
        }
    }

    /// Short name for log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeoJson { .. } => "geojson",
            Self::Totals { .. } => "totals",
            Self::AllNSurplus { .. } => "all_n_surplus",
            Self::ChartData { .. } => "chart-data",
            Self::FullNChartData { .. } => "full-n-chart-data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config() {
        let config = ApiConfig::new("http://localhost:8000/").timeout(5000);
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_ms, 5000);

        let default = ApiConfig::default();
        assert_eq!(default.base_url, "");
        assert_eq!(default.timeout_ms, 15_000);
    }

    #[test]
    fn test_endpoint_paths() {
        let config = ApiConfig::default();
        let geo = Endpoint::GeoJson {
            level: AdminLevel::CoastalCatchment,
        };
        assert_eq!(config.url_for(&geo), "/geojson/coastal_catchment");
        assert!(geo.query().is_empty());

        let remote = ApiConfig::new("https://nbudget.example.org");
        let totals = Endpoint::Totals {
            level: AdminLevel::Kommune,
            variable: Variable::DonNh4,
        };
        assert_eq!(remote.url_for(&totals), "https://nbudget.example.org/totals");
        assert_eq!(
            totals.query(),
            vec![
                ("level", "kommune".to_string()),
                ("variable", "DON_NH4".to_string())
            ]
        );
    }

    #[test]
    fn test_chart_queries_carry_region_name() {
        let series = Endpoint::ChartData {
            level: AdminLevel::Region,
            name: "Region Midtjylland".into(),
            variable: Variable::N2O,
            landuse: LandUse::Forest,
        };
        assert_eq!(series.path(), "/chart-data");
        assert_eq!(
            series.query(),
            vec![
                ("level", "region".to_string()),
                ("name", "Region Midtjylland".to_string()),
                ("variable", "N2O".to_string()),
                ("landuse", "forest".to_string()),
            ]
        );

        let budget = Endpoint::FullNChartData {
            level: AdminLevel::National,
            name: "Denmark".into(),
            landuse: LandUse::CropGrass,
        };
        assert_eq!(budget.label(), "full-n-chart-data");
        assert_eq!(budget.query()[2], ("landuse", "cropgrass".to_string()));
    }

    #[test]
    fn test_api_error_into_dash_error() {
        let err: DashError = ApiError::Timeout { millis: 15_000 }.into();
        assert_eq!(err.to_string(), "Request timed out after 15000 ms");
    }
}
