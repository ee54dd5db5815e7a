use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::external::series_source::SeriesSource;
use crate::models::catalog::{self, DEFAULT_PRICE_SELECTION};
use crate::models::{DateRange, Frequency, RequestParameters};
use crate::services::orchestrator::{Orchestrator, Snapshot};
use crate::services::price_data_service::{PriceData, PriceDataLoader};
use crate::services::production_data_service::{ProductionData, ProductionDataLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Prices,
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSelection {
    pub series_ids: Vec<String>,
    pub frequency: Frequency,
    pub range: DateRange,
}

impl Default for PriceSelection {
    fn default() -> Self {
        Self {
            series_ids: DEFAULT_PRICE_SELECTION.iter().map(|s| s.to_string()).collect(),
            frequency: Frequency::Monthly,
            range: DateRange::FiveYears,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSelection {
    pub series_ids: Vec<String>,
    pub range: DateRange,
}

impl Default for ProductionSelection {
    fn default() -> Self {
        Self {
            series_ids: catalog::default_production_ids(),
            range: DateRange::TenYears,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSelections {
    pub tab: Tab,
    pub prices: PriceSelection,
    pub production: ProductionSelection,
}

impl DashboardSelections {
    /// Parameters for the price view. Empty while the production tab is active.
    pub fn price_params(&self) -> RequestParameters {
        let series_ids = match self.tab {
            Tab::Prices => self.prices.series_ids.clone(),
            Tab::Production => Vec::new(),
        };
        RequestParameters::new(
            series_ids,
            self.prices.frequency,
            self.prices.range.limit_for(self.prices.frequency),
        )
    }

    /// Parameters for the production view. Empty while the price tab is active.
    pub fn production_params(&self) -> RequestParameters {
        let series_ids = match self.tab {
            Tab::Production => self.production.series_ids.clone(),
            Tab::Prices => Vec::new(),
        };
        RequestParameters::new(
            series_ids,
            Frequency::Monthly,
            self.production.range.limit_for(Frequency::Monthly),
        )
    }
}

/// Removes `id` if present, appends it otherwise.
fn toggle(ids: &mut Vec<String>, id: &str) {
    if let Some(pos) = ids.iter().position(|s| s == id) {
        ids.remove(pos);
    } else {
        ids.push(id.to_string());
    }
}

/// Owns the user's selections and drives both orchestrators from them.
pub struct DashboardService {
    selections: Mutex<DashboardSelections>,
    prices: Orchestrator<PriceDataLoader>,
    production: Orchestrator<ProductionDataLoader>,
}

impl DashboardService {
    pub fn new(price_source: Arc<dyn SeriesSource>, production_source: Arc<dyn SeriesSource>) -> Self {
        Self {
            selections: Mutex::new(DashboardSelections::default()),
            prices: Orchestrator::new(PriceDataLoader::new(price_source)),
            production: Orchestrator::new(ProductionDataLoader::new(production_source)),
        }
    }

    pub fn selections(&self) -> DashboardSelections {
        self.selections.lock().clone()
    }

    pub fn prices(&self) -> &Orchestrator<PriceDataLoader> {
        &self.prices
    }

    pub fn production(&self) -> &Orchestrator<ProductionDataLoader> {
        &self.production
    }

    pub fn price_snapshot(&self) -> Arc<Snapshot<PriceData>> {
        self.prices.current()
    }

    pub fn production_snapshot(&self) -> Arc<Snapshot<ProductionData>> {
        self.production.current()
    }

    /// Start cycles for both views regardless of whether parameters changed.
    /// Returns the new price and production generations.
    pub fn refresh(&self) -> (u64, u64) {
        let selections = self.selections.lock();
        let prices = self.prices.set_params(selections.price_params());
        let production = self.production.set_params(selections.production_params());
        (prices, production)
    }

    pub fn select_tab(&self, tab: Tab) {
        self.update(|s| s.tab = tab);
    }

    pub fn toggle_price_series(&self, series_id: &str) -> Result<(), AppError> {
        if catalog::price_descriptor(series_id).is_none() {
            return Err(AppError::NotFound(format!("Unknown price series {}", series_id)));
        }
        self.update(|s| toggle(&mut s.prices.series_ids, series_id));
        Ok(())
    }

    /// Apply any combination of price control changes as one cycle.
    pub fn update_prices(
        &self,
        series_ids: Option<Vec<String>>,
        frequency: Option<Frequency>,
        range: Option<DateRange>,
    ) -> Result<(), AppError> {
        let series_ids = series_ids.map(dedup_ids);
        if let Some(ids) = &series_ids {
            if let Some(unknown) = ids.iter().find(|id| catalog::price_descriptor(id).is_none()) {
                return Err(AppError::NotFound(format!("Unknown price series {}", unknown)));
            }
        }

        self.update(|s| {
            if let Some(ids) = series_ids {
                s.prices.series_ids = ids;
            }
            if let Some(frequency) = frequency {
                s.prices.frequency = frequency;
            }
            if let Some(range) = range {
                s.prices.range = range;
            }
        });
        Ok(())
    }

    pub fn toggle_production_series(&self, series_id: &str) -> Result<(), AppError> {
        validate_series_id(series_id)?;
        self.update(|s| toggle(&mut s.production.series_ids, series_id));
        Ok(())
    }

    /// Append a discovered state to the production selection.
    pub fn add_production_state(&self, series_id: &str) -> Result<(), AppError> {
        validate_series_id(series_id)?;
        self.update(|s| {
            if !s.production.series_ids.iter().any(|id| id == series_id) {
                s.production.series_ids.push(series_id.to_string());
            }
        });
        Ok(())
    }

    pub fn update_production(
        &self,
        series_ids: Option<Vec<String>>,
        range: Option<DateRange>,
    ) -> Result<(), AppError> {
        let series_ids = series_ids.map(dedup_ids);
        if let Some(ids) = &series_ids {
            for id in ids {
                validate_series_id(id)?;
            }
        }

        self.update(|s| {
            if let Some(ids) = series_ids {
                s.production.series_ids = ids;
            }
            if let Some(range) = range {
                s.production.range = range;
            }
        });
        Ok(())
    }

    /// Apply a selection change and restart whichever view's parameters moved.
    fn update<F: FnOnce(&mut DashboardSelections)>(&self, change: F) {
        let mut selections = self.selections.lock();
        change(&mut selections);

        let price_params = selections.price_params();
        if self.prices.current().params.as_ref() != Some(&price_params) {
            self.prices.set_params(price_params);
        }

        let production_params = selections.production_params();
        if self.production.current().params.as_ref() != Some(&production_params) {
            self.production.set_params(production_params);
        }

        info!("Dashboard selection now on {:?} tab", selections.tab);
    }
}

/// Drops repeated ids, keeping the first occurrence.
fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

fn validate_series_id(series_id: &str) -> Result<(), AppError> {
    if series_id.trim().is_empty() {
        return Err(AppError::Validation("series id must not be empty".to_string()));
    }
    Ok(())
}
