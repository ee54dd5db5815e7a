use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::FetchError;

/// Minimal `GET -> JSON` capability the data sources are built on.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

/// reqwest-backed transport against the EIA proxy.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Endpoint paths are resolved under `base_url`, including any path
    /// prefix it carries (`http://host/eia` serves `/eia/api/prices`).
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidInput(format!("bad request path '{}': {}", path, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.endpoint(path)?;

        debug!("GET {} {:?}", url, query);

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::Schema(format!("response body is not JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    /// Serves a tiny proxy under `/eia` and returns its base URL.
    async fn spawn_proxy() -> Url {
        let app = Router::new()
            .route(
                "/eia/api/prices",
                get(|RawQuery(query): RawQuery| async move { Json(json!({ "query": query })) }),
            )
            .route("/eia/api/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/eia/api/garbage", get(|| async { "<html>not json</html>" }))
            .route("/api/prices", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{}/eia", addr)).unwrap()
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let transport = HttpTransport::new(Url::parse("http://proxy.local/eia").unwrap());
        assert_eq!(
            transport.endpoint("/api/prices").unwrap().as_str(),
            "http://proxy.local/eia/api/prices"
        );

        let transport = HttpTransport::new(Url::parse("http://proxy.local").unwrap());
        assert_eq!(
            transport.endpoint("/api/production/states").unwrap().as_str(),
            "http://proxy.local/api/production/states"
        );
    }

    #[tokio::test]
    async fn sends_query_under_prefixed_base() {
        let transport = HttpTransport::new(spawn_proxy().await);

        let body = transport
            .get_json(
                "/api/prices",
                &[("series_id", "RNGC1".to_string()), ("limit", "12".to_string())],
            )
            .await
            .unwrap();

        assert_eq!(body["query"], "series_id=RNGC1&limit=12");
    }

    #[tokio::test]
    async fn non_success_status_becomes_transport_error() {
        let transport = HttpTransport::new(spawn_proxy().await);

        let err = transport.get_json("/api/broken", &[]).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { status: 500, .. }));
        assert_eq!(err.to_string(), "API error: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn non_json_body_is_schema_error() {
        let transport = HttpTransport::new(spawn_proxy().await);

        let err = transport.get_json("/api/garbage", &[]).await.unwrap_err();

        assert!(matches!(err, FetchError::Schema(_)));
    }
}
