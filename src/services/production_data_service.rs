use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::FetchError;
use crate::external::series_source::{fetch_many, SeriesSource};
use crate::models::catalog::addable_states;
use crate::models::{Frequency, MergedTable, RequestParameters, StateInfo};
use crate::services::merge_service::merge_by_date;
use crate::services::orchestrator::CycleLoader;

/// Output of one production cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionData {
    pub table: MergedTable,
    pub available_states: Vec<StateInfo>,
    /// Available states that are not default series.
    pub addable_states: Vec<StateInfo>,
}

pub struct ProductionDataLoader {
    source: Arc<dyn SeriesSource>,
}

impl ProductionDataLoader {
    pub fn new(source: Arc<dyn SeriesSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CycleLoader for ProductionDataLoader {
    type Output = ProductionData;

    fn name(&self) -> &'static str {
        "production"
    }

    async fn load(&self, params: &RequestParameters) -> Result<ProductionData, FetchError> {
        let source = self.source.as_ref();

        let states = async {
            source
                .fetch_catalog_extras()
                .await
                .map_err(|e| e.in_batch("state catalog"))
        };

        let (series, available_states) = futures::try_join!(
            fetch_many(source, &params.series_ids, Frequency::Monthly, params.limit),
            states,
        )?;

        Ok(ProductionData {
            table: merge_by_date(series.values()),
            addable_states: addable_states(&available_states),
            available_states,
        })
    }
}
