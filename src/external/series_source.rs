use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::FetchError;
use crate::models::{Frequency, LatestValue, Limit, SeriesResponse, StateInfo};

/// Data access contract shared by the price and production sources.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    async fn fetch_series(
        &self,
        id: &str,
        frequency: Frequency,
        limit: Limit,
    ) -> Result<SeriesResponse, FetchError>;

    /// Most recent observation, via a single-point series query.
    async fn fetch_latest(&self, id: &str, frequency: Frequency) -> Result<LatestValue, FetchError> {
        let resp = self.fetch_series(id, frequency, Limit::Count(1)).await?;
        latest_of(resp)
    }

    /// Series discoverable beyond the static catalog.
    async fn fetch_catalog_extras(&self) -> Result<Vec<StateInfo>, FetchError>;
}

/// Fetch several series concurrently. The first failure fails the batch and
/// the remaining results are dropped.
pub async fn fetch_many(
    source: &dyn SeriesSource,
    ids: &[String],
    frequency: Frequency,
    limit: Limit,
) -> Result<BTreeMap<String, SeriesResponse>, FetchError> {
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let fetches = ids.iter().map(|id| async move {
        source
            .fetch_series(id, frequency, limit)
            .await
            .map_err(|e| e.in_batch(format!("series {}", id)))
    });

    let responses = try_join_all(fetches).await?;

    Ok(responses
        .into_iter()
        .map(|resp| (resp.series_id.clone(), resp))
        .collect())
}

pub(crate) fn validate_request(id: &str, limit: Limit) -> Result<(), FetchError> {
    if id.trim().is_empty() {
        return Err(FetchError::InvalidInput("series id must not be empty".into()));
    }
    if !limit.is_valid() {
        return Err(FetchError::InvalidInput("limit must be a positive integer".into()));
    }
    Ok(())
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::Schema(format!("{}: {}", what, e)))
}

/// The proxy echoes the requested id; anything else is a contract violation.
pub(crate) fn check_series_id(requested: &str, returned: &str) -> Result<(), FetchError> {
    if requested != returned {
        return Err(FetchError::Schema(format!(
            "requested series {} but response is for {}",
            requested, returned
        )));
    }
    Ok(())
}

fn latest_of(resp: SeriesResponse) -> Result<LatestValue, FetchError> {
    let series_id = resp.series_id;
    let point = resp
        .points
        .into_iter()
        .max_by(|a, b| a.date.cmp(&b.date))
        .ok_or_else(|| FetchError::Schema(format!("no observations for series {}", series_id)))?;

    Ok(LatestValue {
        series_id,
        date: point.date,
        value: point.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SeriesMetadata, SeriesPoint};

    struct FixedSource;

    #[async_trait]
    impl SeriesSource for FixedSource {
        async fn fetch_series(
            &self,
            id: &str,
            _frequency: Frequency,
            _limit: Limit,
        ) -> Result<SeriesResponse, FetchError> {
            match id {
                "BROKEN" => Err(FetchError::Transport {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                }),
                "EMPTY" => Ok(SeriesResponse {
                    series_id: id.to_string(),
                    metadata: SeriesMetadata::default(),
                    points: vec![],
                }),
                _ => Ok(SeriesResponse {
                    series_id: id.to_string(),
                    metadata: SeriesMetadata::default(),
                    points: vec![
                        SeriesPoint::new("2024-03-01", 1.5),
                        SeriesPoint::new("2024-03-04", 1.8),
                        SeriesPoint::new("2024-02-29", 1.4),
                    ],
                }),
            }
        }

        async fn fetch_catalog_extras(&self) -> Result<Vec<StateInfo>, FetchError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn latest_picks_most_recent_date() {
        let latest = FixedSource.fetch_latest("RNGWHHD", Frequency::Daily).await.unwrap();
        assert_eq!(latest.date, "2024-03-04");
        assert_eq!(latest.value, 1.8);
    }

    #[tokio::test]
    async fn latest_without_points_is_schema_error() {
        let err = FixedSource.fetch_latest("EMPTY", Frequency::Daily).await.unwrap_err();
        assert!(matches!(err, FetchError::Schema(_)));
    }

    #[tokio::test]
    async fn fetch_many_keys_by_series_id() {
        let ids = vec!["RNGC1".to_string(), "RNGC2".to_string()];
        let map = fetch_many(&FixedSource, &ids, Frequency::Monthly, Limit::Count(12))
            .await
            .unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("RNGC1"));
        assert!(map.contains_key("RNGC2"));
    }

    #[tokio::test]
    async fn fetch_many_fails_whole_batch() {
        let ids = vec!["RNGC1".to_string(), "BROKEN".to_string(), "RNGC3".to_string()];
        let err = fetch_many(&FixedSource, &ids, Frequency::Monthly, Limit::Count(12))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("series BROKEN"));
    }

    #[tokio::test]
    async fn fetch_many_with_no_ids_is_empty() {
        let map = fetch_many(&FixedSource, &[], Frequency::Daily, Limit::Unbounded)
            .await
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn request_validation_rejects_blank_id_and_zero_limit() {
        assert!(validate_request("", Limit::Count(1)).is_err());
        assert!(validate_request("RNGC1", Limit::Count(0)).is_err());
        assert!(validate_request("RNGC1", Limit::Unbounded).is_ok());
    }
}
