use serde::{Deserialize, Serialize};

/// Largest `limit` the EIA proxy accepts; an unbounded request is sent as this.
pub const PROXY_MAX_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of most recent points to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Count(u32),
    Unbounded,
}

impl Limit {
    /// Value sent as the `limit` query parameter.
    pub fn to_query(&self) -> u32 {
        match self {
            Limit::Count(n) => (*n).min(PROXY_MAX_LIMIT),
            Limit::Unbounded => PROXY_MAX_LIMIT,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Limit::Count(0))
    }
}

/// Date-range presets offered by the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    #[default]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
    #[serde(rename = "All")]
    All,
}

impl DateRange {
    pub fn limit_for(&self, frequency: Frequency) -> Limit {
        let daily = frequency == Frequency::Daily;
        match self {
            DateRange::OneYear => Limit::Count(if daily { 365 } else { 12 }),
            DateRange::FiveYears => Limit::Count(if daily { 1825 } else { 60 }),
            DateRange::TenYears => Limit::Count(if daily { 3650 } else { 120 }),
            DateRange::All => Limit::Unbounded,
        }
    }
}

/// Inputs of one fetch cycle. A published result is only valid for the exact
/// parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameters {
    pub series_ids: Vec<String>,
    pub frequency: Frequency,
    pub limit: Limit,
}

impl RequestParameters {
    pub fn new(series_ids: Vec<String>, frequency: Frequency, limit: Limit) -> Self {
        Self {
            series_ids,
            frequency,
            limit,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.limit.is_valid() {
            return Err("limit must be a positive integer".to_string());
        }
        if let Some(pos) = self.series_ids.iter().position(|id| id.trim().is_empty()) {
            return Err(format!("series id at position {} is empty", pos));
        }
        Ok(())
    }
}
