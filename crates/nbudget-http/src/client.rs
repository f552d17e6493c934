//! Backend client with bounded timeouts and request sequencing

use crate::{ApiConfig, ApiError, Endpoint};
use futures::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use nbudget_core::{AdminLevel, FeatureCollection, FluxBudget, JsonRow, LandUse, Variable};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// API CLIENT
// ============================================================================

/// Client for the nitrogen budget backend
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// GET an endpoint and decode its JSON body, failing after the configured
    /// timeout
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
        let millis = self.config.timeout_ms;
        let fetch = Box::pin(self.fetch_text(endpoint));
        let timer = Box::pin(TimeoutFuture::new(millis));

        let text = match select(fetch, timer).await {
            Either::Left((result, _)) => result?,
            Either::Right(_) => {
                tracing::error!(endpoint = endpoint.label(), millis, "request timed out");
                return Err(ApiError::Timeout { millis });
            }
        };

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(endpoint = endpoint.label(), "decode failed: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    async fn fetch_text(&self, endpoint: &Endpoint) -> Result<String, ApiError> {
        let url = self.config.url_for(endpoint);
        let query = endpoint.query();
        tracing::debug!("GET {} {:?}", url, query);

        let resp = Request::get(&url)
            .query(query.iter().map(|(k, v)| (*k, v.as_str())))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = endpoint.label(), "network error: {}", e);
                ApiError::Network(e.to_string())
            })?;

        if !resp.ok() {
            let status = resp.status();
            tracing::error!(endpoint = endpoint.label(), status, "bad status");
            return Err(ApiError::Status { status, url });
        }

        resp.text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn geojson(&self, level: AdminLevel) -> Result<FeatureCollection, ApiError> {
        self.get_json(&Endpoint::GeoJson { level }).await
    }

    pub async fn totals(
        &self,
        level: AdminLevel,
        variable: Variable,
    ) -> Result<Vec<JsonRow>, ApiError> {
        self.get_json(&Endpoint::Totals { level, variable }).await
    }

    pub async fn all_n_surplus(
        &self,
        level: AdminLevel,
        landuse: LandUse,
    ) -> Result<BTreeMap<String, Option<f64>>, ApiError> {
        self.get_json(&Endpoint::AllNSurplus { level, landuse }).await
    }

    pub async fn chart_data(
        &self,
        level: AdminLevel,
        name: &str,
        variable: Variable,
        landuse: LandUse,
    ) -> Result<Vec<JsonRow>, ApiError> {
        self.get_json(&Endpoint::ChartData {
            level,
            name: name.to_string(),
            variable,
            landuse,
        })
        .await
    }

    pub async fn full_n_chart_data(
        &self,
        level: AdminLevel,
        name: &str,
        landuse: LandUse,
    ) -> Result<FluxBudget, ApiError> {
        self.get_json(&Endpoint::FullNChartData {
            level,
            name: name.to_string(),
            landuse,
        })
        .await
    }
}

// ============================================================================
// REQUEST SEQUENCING (Send + Sync)
// ============================================================================

/// Hands out increasing request tickets for one channel (map layer, popup)
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn issue(&self) -> RequestTicket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersede outstanding tickets without starting a request
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Generation token carried by an in-flight request
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }

    /// `Err(Stale)` once a newer ticket has been issued
    pub fn ensure_current(&self) -> Result<(), ApiError> {
        if self.is_current() {
            Ok(())
        } else {
            tracing::warn!(ticket = self.id, "dropping stale response");
            Err(ApiError::Stale)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        assert!(first.is_current());

        let second = seq.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(first.ensure_current(), Err(ApiError::Stale));
        assert_eq!(second.ensure_current(), Ok(()));
        assert!(second.id() > first.id());
    }

    #[test]
    fn test_invalidate_supersedes_outstanding() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        seq.invalidate();
        assert!(!ticket.is_current());
    }

    #[test]
    fn test_sequencers_are_independent() {
        let map = RequestSequencer::new();
        let popup = RequestSequencer::new();
        let map_ticket = map.issue();
        popup.issue();
        popup.issue();
        assert!(map_ticket.is_current());
    }

    #[test]
    fn test_clones_share_generation() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        seq.clone().issue();
        assert!(!ticket.is_current());
    }
}
