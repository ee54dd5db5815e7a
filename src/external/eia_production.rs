use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::FetchError;
use crate::external::series_source::{check_series_id, decode, validate_request, SeriesSource};
use crate::external::transport::Transport;
use crate::models::{Frequency, Limit, SeriesMetadata, SeriesPoint, SeriesResponse, StateInfo};

const PRODUCTION_PATH: &str = "/api/production";
const STATES_PATH: &str = "/api/production/states";

/// Monthly marketed production from `/api/production`.
///
/// The proxy only stores monthly production, so the requested frequency is
/// not forwarded.
pub struct EiaProductionSource {
    transport: Arc<dyn Transport>,
}

impl EiaProductionSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[derive(Debug, Deserialize)]
struct ProductionPayload {
    series_id: String,
    area_name: String,
    units: String,
    count: usize,
    data: Vec<ProductionPayloadPoint>,
}

#[derive(Debug, Deserialize)]
struct ProductionPayloadPoint {
    date: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct StatesPayload {
    states: Vec<StateInfo>,
}

#[async_trait]
impl SeriesSource for EiaProductionSource {
    async fn fetch_series(
        &self,
        id: &str,
        frequency: Frequency,
        limit: Limit,
    ) -> Result<SeriesResponse, FetchError> {
        validate_request(id, limit)?;
        if frequency != Frequency::Monthly {
            debug!("Production series {} requested as {}, using monthly", id, frequency);
        }

        let body = self
            .transport
            .get_json(
                PRODUCTION_PATH,
                &[
                    ("series_id", id.to_string()),
                    ("limit", limit.to_query().to_string()),
                ],
            )
            .await?;

        let payload: ProductionPayload = decode(body, "production response")?;
        check_series_id(id, &payload.series_id)?;

        if payload.count != payload.data.len() {
            debug!(
                "Production response for {} reports count={} but carries {} points",
                id,
                payload.count,
                payload.data.len()
            );
        }

        let area_name = Some(payload.area_name).filter(|name| !name.is_empty());

        Ok(SeriesResponse {
            series_id: payload.series_id,
            metadata: SeriesMetadata {
                units: payload.units,
                area_name,
            },
            points: payload
                .data
                .into_iter()
                .map(|p| SeriesPoint::new(p.date, p.value))
                .collect(),
        })
    }

    async fn fetch_catalog_extras(&self) -> Result<Vec<StateInfo>, FetchError> {
        let body = self.transport.get_json(STATES_PATH, &[]).await?;
        let payload: StatesPayload = decode(body, "states response")?;
        Ok(payload.states)
    }
}
