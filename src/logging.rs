use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

const DEFAULT_SERVICE_NAME: &str = "energy-dashboard";

/// Subscriber settings read from the environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `RUST_LOG`-style directives.
    pub filter: String,
    pub service_name: String,
    pub environment: String,
    /// Loki push endpoint. Console only when `None`.
    pub loki_url: Option<Url>,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let loki_enabled = var("LOKI_ENABLED")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let loki_url = match (loki_enabled, var("LOKI_URL")) {
            (false, _) => None,
            (true, None) => return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string()),
            (true, Some(raw)) => Some(
                Url::parse(&raw).map_err(|e| format!("LOKI_URL '{}' is not a valid URL: {}", raw, e))?,
            ),
        };

        Ok(Self {
            filter: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            service_name: var("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            loki_url,
        })
    }
}

/// Install the global subscriber: env filter, console output and, with the
/// `loki` feature, a Loki layer when an endpoint is configured.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "loki")]
    let loki = match config.loki_url.clone() {
        Some(url) => {
            let (layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url)?;
            // Ships buffered lines in the background; needs the Tokio runtime.
            tokio::spawn(task);
            Some(layer)
        }
        None => None,
    };
    #[cfg(not(feature = "loki"))]
    let loki: Option<tracing_subscriber::layer::Identity> = None;

    let shipping = loki.is_some();

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(fmt::layer())
        .with(loki)
        .try_init()?;

    match (&config.loki_url, shipping) {
        (Some(url), true) => tracing::info!("📊 Logging to console and Loki at {}", url),
        (Some(_), false) => tracing::warn!("LOKI_URL is set but built without the loki feature"),
        (None, _) => tracing::info!("📊 Console logging at level {}", config.filter),
    }

    Ok(())
}
