use std::net::SocketAddr;

use url::Url;

const DEFAULT_PROXY_URL: &str = "http://localhost:8000";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the EIA proxy serving `/api/prices` and `/api/production`.
    pub proxy_url: Url,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_values(
            std::env::var("EIA_PROXY_URL").ok(),
            std::env::var("BIND_ADDR").ok(),
        )
    }

    fn from_values(proxy_url: Option<String>, bind_addr: Option<String>) -> Result<Self, String> {
        let proxy_url = proxy_url.unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());
        let proxy_url = Url::parse(&proxy_url)
            .map_err(|e| format!("EIA_PROXY_URL '{}' is not a valid URL: {}", proxy_url, e))?;
        if proxy_url.cannot_be_a_base() {
            return Err(format!("EIA_PROXY_URL '{}' cannot be used as a base URL", proxy_url));
        }

        let bind_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| format!("BIND_ADDR '{}' is not a socket address: {}", bind_addr, e))?;

        Ok(Self { proxy_url, bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_values(None, None).unwrap();
        assert_eq!(config.proxy_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_values(Some("not a url".into()), None).is_err());
        assert!(AppConfig::from_values(Some("mailto:ops@example.com".into()), None).is_err());
        assert!(AppConfig::from_values(None, Some("localhost".into())).is_err());
    }
}
