use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::FetchError;
use crate::external::series_source::{check_series_id, decode, validate_request, SeriesSource};
use crate::external::transport::Transport;
use crate::models::{Frequency, Limit, SeriesMetadata, SeriesPoint, SeriesResponse, StateInfo};

const PRICES_PATH: &str = "/api/prices";

/// Natural-gas spot and futures prices from `/api/prices`.
pub struct EiaPriceSource {
    transport: Arc<dyn Transport>,
}

impl EiaPriceSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[derive(Debug, Deserialize)]
struct PricesPayload {
    series_id: String,
    units: String,
    count: usize,
    data: Vec<PricePayloadPoint>,
}

#[derive(Debug, Deserialize)]
struct PricePayloadPoint {
    date: String,
    price: f64,
}

#[async_trait]
impl SeriesSource for EiaPriceSource {
    async fn fetch_series(
        &self,
        id: &str,
        frequency: Frequency,
        limit: Limit,
    ) -> Result<SeriesResponse, FetchError> {
        validate_request(id, limit)?;

        let body = self
            .transport
            .get_json(
                PRICES_PATH,
                &[
                    ("series_id", id.to_string()),
                    ("frequency", frequency.to_string()),
                    ("limit", limit.to_query().to_string()),
                ],
            )
            .await?;

        let payload: PricesPayload = decode(body, "prices response")?;
        check_series_id(id, &payload.series_id)?;

        if payload.count != payload.data.len() {
            debug!(
                "Price response for {} reports count={} but carries {} points",
                id,
                payload.count,
                payload.data.len()
            );
        }

        Ok(SeriesResponse {
            series_id: payload.series_id,
            metadata: SeriesMetadata {
                units: payload.units,
                area_name: None,
            },
            points: payload
                .data
                .into_iter()
                .map(|p| SeriesPoint::new(p.date, p.price))
                .collect(),
        })
    }

    async fn fetch_catalog_extras(&self) -> Result<Vec<StateInfo>, FetchError> {
        // The price catalog is entirely static.
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    struct RecordingTransport {
        body: Value,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
            self.calls.lock().push((
                path.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            Ok(self.body.clone())
        }
    }

    fn source_with(body: Value) -> (EiaPriceSource, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            body,
            calls: Mutex::new(Vec::new()),
        });
        (EiaPriceSource::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn builds_query_and_normalizes_points() {
        let (source, transport) = source_with(json!({
            "series_id": "RNGWHHD",
            "units": "$/MMBtu",
            "count": 2,
            "data": [
                {"date": "2024-01", "price": 3.18},
                {"date": "2024-02", "price": 1.72}
            ]
        }));

        let resp = source
            .fetch_series("RNGWHHD", Frequency::Monthly, Limit::Unbounded)
            .await
            .unwrap();

        assert_eq!(resp.metadata.units, "$/MMBtu");
        assert_eq!(resp.points, vec![SeriesPoint::new("2024-01", 3.18), SeriesPoint::new("2024-02", 1.72)]);

        let calls = transport.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/api/prices");
        assert!(calls[0].1.contains(&("frequency".to_string(), "monthly".to_string())));
        assert!(calls[0].1.contains(&("limit".to_string(), "10000".to_string())));
    }

    #[tokio::test]
    async fn missing_data_field_is_schema_error() {
        let (source, _) = source_with(json!({"series_id": "RNGC1", "units": "$/MMBtu", "count": 0}));
        let err = source
            .fetch_series("RNGC1", Frequency::Daily, Limit::Count(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Schema(_)));
    }

    #[tokio::test]
    async fn blank_id_never_reaches_transport() {
        let (source, transport) = source_with(json!({}));
        let err = source
            .fetch_series("  ", Frequency::Daily, Limit::Count(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidInput(_)));
        assert!(transport.calls.lock().is_empty());
    }
}
