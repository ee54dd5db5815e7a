use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use energy_dashboard::app;
use energy_dashboard::config::AppConfig;
use energy_dashboard::external::eia_prices::EiaPriceSource;
use energy_dashboard::external::eia_production::EiaProductionSource;
use energy_dashboard::external::transport::{HttpTransport, Transport};
use energy_dashboard::logging::{init_logging, LoggingConfig};
use energy_dashboard::services::dashboard_service::DashboardService;
use energy_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    let logging = LoggingConfig::from_env().map_err(anyhow::Error::msg)?;
    init_logging(logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.proxy_url.clone()));
    tracing::info!("📡 Using EIA proxy at {}", config.proxy_url);

    let dashboard = Arc::new(DashboardService::new(
        Arc::new(EiaPriceSource::new(transport.clone())),
        Arc::new(EiaProductionSource::new(transport)),
    ));
    dashboard.refresh();

    let app = app::create_app(AppState { dashboard });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Energy dashboard running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
