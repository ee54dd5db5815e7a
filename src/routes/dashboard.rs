use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{DateRange, Frequency};
use crate::services::dashboard_service::{DashboardSelections, Tab};
use crate::services::orchestrator::Snapshot;
use crate::services::price_data_service::PriceData;
use crate::services::production_data_service::ProductionData;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_selections))
        .route("/tab", put(select_tab))
        .route("/refresh", post(refresh))
        .route("/prices", get(get_prices).put(update_prices))
        .route("/prices/toggle/:series_id", post(toggle_price_series))
        .route("/production", get(get_production).put(update_production))
        .route("/production/toggle/:series_id", post(toggle_production_series))
        .route("/production/states/:series_id", post(add_production_state))
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePricesRequest {
    pub series_ids: Option<Vec<String>>,
    pub frequency: Option<Frequency>,
    pub range: Option<DateRange>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductionRequest {
    pub series_ids: Option<Vec<String>>,
    pub range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub prices: u64,
    pub production: u64,
}

async fn get_selections(State(state): State<AppState>) -> Json<DashboardSelections> {
    info!("GET /api/dashboard - Getting selections");
    Json(state.dashboard.selections())
}

async fn select_tab(
    State(state): State<AppState>,
    Json(req): Json<TabRequest>,
) -> Json<DashboardSelections> {
    info!("PUT /api/dashboard/tab - Switching to {:?}", req.tab);
    state.dashboard.select_tab(req.tab);
    Json(state.dashboard.selections())
}

/// Re-runs both views with their current parameters, e.g. after a failure.
async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<RefreshResponse>) {
    info!("POST /api/dashboard/refresh - Refetching both views");
    let (prices, production) = state.dashboard.refresh();
    (StatusCode::ACCEPTED, Json(RefreshResponse { prices, production }))
}

async fn get_prices(State(state): State<AppState>) -> Json<Arc<Snapshot<PriceData>>> {
    Json(state.dashboard.price_snapshot())
}

async fn update_prices(
    State(state): State<AppState>,
    Json(req): Json<UpdatePricesRequest>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    info!("PUT /api/dashboard/prices - Updating price selection");
    state
        .dashboard
        .update_prices(req.series_ids, req.frequency, req.range)
        .map_err(|e| {
            warn!("Rejected price selection: {}", e);
            e
        })?;
    Ok(accepted(state.dashboard.price_snapshot().generation))
}

async fn toggle_price_series(
    Path(series_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    info!("POST /api/dashboard/prices/toggle/{}", series_id);
    state.dashboard.toggle_price_series(&series_id)?;
    Ok(accepted(state.dashboard.price_snapshot().generation))
}

async fn get_production(State(state): State<AppState>) -> Json<Arc<Snapshot<ProductionData>>> {
    Json(state.dashboard.production_snapshot())
}

async fn update_production(
    State(state): State<AppState>,
    Json(req): Json<UpdateProductionRequest>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    info!("PUT /api/dashboard/production - Updating production selection");
    state.dashboard.update_production(req.series_ids, req.range)?;
    Ok(accepted(state.dashboard.production_snapshot().generation))
}

async fn toggle_production_series(
    Path(series_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    info!("POST /api/dashboard/production/toggle/{}", series_id);
    state.dashboard.toggle_production_series(&series_id)?;
    Ok(accepted(state.dashboard.production_snapshot().generation))
}

async fn add_production_state(
    Path(series_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    info!("POST /api/dashboard/production/states/{}", series_id);
    state.dashboard.add_production_state(&series_id)?;
    Ok(accepted(state.dashboard.production_snapshot().generation))
}

fn accepted(generation: u64) -> (StatusCode, Json<GenerationResponse>) {
    (StatusCode::ACCEPTED, Json(GenerationResponse { generation }))
}
