use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One observation for one series. Dates are `YYYY-MM-DD` (daily) or `YYYY-MM`
/// (monthly) and sort correctly as plain strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub units: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
}

/// Result of a single series fetch. `points` carry no ordering guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub series_id: String,
    pub metadata: SeriesMetadata,
    pub points: Vec<SeriesPoint>,
}

/// Most recent observation of a series, fetched on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub series_id: String,
    pub date: String,
    pub value: f64,
}

/// A date row of the merged table. A series with no point on `date` has no
/// entry in `values`, so charts render a gap rather than a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

impl MergedRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, series_id: &str) -> Option<f64> {
        self.values.get(series_id).copied()
    }
}

/// Rows sorted ascending by date, one row per distinct date.
pub type MergedTable = Vec<MergedRow>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub label: String,
    pub series_id: String,
    pub value: f64,
    /// False when no latest value existed and `value` is a 0 placeholder.
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveProjection {
    pub points: Vec<CurvePoint>,
    /// Spot reference line, kept out of `points`.
    pub reference: Option<LatestValue>,
}

/// A production series discoverable from the proxy's state listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub series_id: String,
    pub duoarea: String,
    pub area_name: String,
}
