//! In-memory series source used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use energy_dashboard::errors::FetchError;
use energy_dashboard::external::series_source::SeriesSource;
use energy_dashboard::models::{
    Frequency, Limit, SeriesMetadata, SeriesPoint, SeriesResponse, StateInfo,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Default)]
pub struct StubSource {
    series: Mutex<HashMap<String, Vec<SeriesPoint>>>,
    failures: Mutex<HashMap<String, u16>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    states: Mutex<Vec<StateInfo>>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, id: &str, points: &[(&str, f64)]) -> Self {
        self.series.lock().insert(
            id.to_string(),
            points.iter().map(|(d, v)| SeriesPoint::new(*d, *v)).collect(),
        );
        self
    }

    pub fn with_failure(self, id: &str, status: u16) -> Self {
        self.failures.lock().insert(id.to_string(), status);
        self
    }

    pub fn with_state(self, series_id: &str, duoarea: &str, area_name: &str) -> Self {
        self.states.lock().push(StateInfo {
            series_id: series_id.to_string(),
            duoarea: duoarea.to_string(),
            area_name: area_name.to_string(),
        });
        self
    }

    /// Hold every fetch of `id` until the returned handle is notified.
    pub fn gate(&self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(id.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SeriesSource for StubSource {
    async fn fetch_series(
        &self,
        id: &str,
        _frequency: Frequency,
        _limit: Limit,
    ) -> Result<SeriesResponse, FetchError> {
        self.calls.lock().push(id.to_string());

        let gate = self.gates.lock().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(status) = self.failures.lock().get(id).copied() {
            return Err(FetchError::Transport {
                status,
                status_text: "Internal Server Error".to_string(),
            });
        }

        let points = self.series.lock().get(id).cloned().unwrap_or_default();
        Ok(SeriesResponse {
            series_id: id.to_string(),
            metadata: SeriesMetadata {
                units: "$/MMBtu".to_string(),
                area_name: None,
            },
            points,
        })
    }

    async fn fetch_catalog_extras(&self) -> Result<Vec<StateInfo>, FetchError> {
        self.calls.lock().push("states".to_string());
        Ok(self.states.lock().clone())
    }
}

/// Catalogued price series with one daily observation each.
pub fn price_stub() -> StubSource {
    StubSource::new()
        .with_series("RNGWHHD", &[("2024-05", 2.12), ("2024-06", 2.54)])
        .with_series("RNGC1", &[("2024-04", 1.60), ("2024-06", 2.71)])
        .with_series("RNGC2", &[("2024-06", 2.95)])
        .with_series("RNGC3", &[("2024-06", 3.20)])
        .with_series("RNGC4", &[("2024-06", 3.41)])
}

pub fn production_stub() -> StubSource {
    StubSource::new()
        .with_series("N9050US2", &[("2024-04", 3_100_000.0), ("2024-05", 3_150_000.0)])
        .with_series("N9050TX2", &[("2024-05", 1_020_000.0)])
        .with_state("N9050AK2", "SAK", "ALASKA")
        .with_state("N9050TX2", "STX", "TEXAS")
}
