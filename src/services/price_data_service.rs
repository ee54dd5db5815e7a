use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Serialize;

use crate::errors::FetchError;
use crate::external::series_source::{fetch_many, SeriesSource};
use crate::models::catalog::{FUTURES_CURVE_IDS, PRICE_SERIES, SPOT_SERIES_ID};
use crate::models::{CurveProjection, Frequency, LatestValue, MergedTable, RequestParameters};
use crate::services::merge_service::{merge_by_date, project_curve, select_latest, snapshot_latest};
use crate::services::orchestrator::CycleLoader;

/// Output of one price cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PriceData {
    pub table: MergedTable,
    /// Daily latest value of every catalogued price series.
    pub latest: BTreeMap<String, LatestValue>,
    /// Latest values of the selected series, in selection order.
    pub selected_latest: Vec<LatestValue>,
    pub curve: CurveProjection,
}

pub struct PriceDataLoader {
    source: Arc<dyn SeriesSource>,
}

impl PriceDataLoader {
    pub fn new(source: Arc<dyn SeriesSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CycleLoader for PriceDataLoader {
    type Output = PriceData;

    fn name(&self) -> &'static str {
        "prices"
    }

    async fn load(&self, params: &RequestParameters) -> Result<PriceData, FetchError> {
        let source = self.source.as_ref();

        // Latest values feed the stat cards and the futures curve, so they are
        // fetched for the whole catalog regardless of the selection.
        let latest_fetches = PRICE_SERIES.iter().map(|descriptor| async move {
            source
                .fetch_latest(descriptor.id, Frequency::Daily)
                .await
                .map_err(|e| e.in_batch(format!("latest {}", descriptor.id)))
        });

        let (series, latest) = futures::try_join!(
            fetch_many(source, &params.series_ids, params.frequency, params.limit),
            try_join_all(latest_fetches),
        )?;

        let table = merge_by_date(series.values());
        let latest = snapshot_latest(latest);
        let selected_latest = select_latest(&latest, &params.series_ids);
        let curve = project_curve(&latest, &FUTURES_CURVE_IDS, Some(SPOT_SERIES_ID));

        Ok(PriceData {
            table,
            latest,
            selected_latest,
            curve,
        })
    }
}
