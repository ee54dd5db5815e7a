use serde::Serialize;

use crate::models::StateInfo;

/// Display metadata for a known series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Henry Hub spot, the reference line of the futures curve.
pub const SPOT_SERIES_ID: &str = "RNGWHHD";

/// NYMEX front-month contracts in curve order.
pub const FUTURES_CURVE_IDS: [&str; 4] = ["RNGC1", "RNGC2", "RNGC3", "RNGC4"];

pub static PRICE_SERIES: [SeriesDescriptor; 5] = [
    SeriesDescriptor { id: "RNGWHHD", label: "Henry Hub Spot", color: "#2563eb" },
    SeriesDescriptor { id: "RNGC1", label: "Futures Month 1", color: "#f59e0b" },
    SeriesDescriptor { id: "RNGC2", label: "Futures Month 2", color: "#10b981" },
    SeriesDescriptor { id: "RNGC3", label: "Futures Month 3", color: "#ef4444" },
    SeriesDescriptor { id: "RNGC4", label: "Futures Month 4", color: "#8b5cf6" },
];

// Marketed production (MMCF), U.S. total plus the largest producing states.
pub static DEFAULT_PRODUCTION_SERIES: [SeriesDescriptor; 5] = [
    SeriesDescriptor { id: "N9050US2", label: "U.S. Total", color: "#2563eb" },
    SeriesDescriptor { id: "N9050TX2", label: "Texas", color: "#f59e0b" },
    SeriesDescriptor { id: "N9050PA2", label: "Pennsylvania", color: "#10b981" },
    SeriesDescriptor { id: "N9050LA2", label: "Louisiana", color: "#ef4444" },
    SeriesDescriptor { id: "N9050NM2", label: "New Mexico", color: "#8b5cf6" },
];

pub const DEFAULT_PRICE_SELECTION: [&str; 2] = ["RNGWHHD", "RNGC1"];

pub fn price_descriptor(id: &str) -> Option<&'static SeriesDescriptor> {
    PRICE_SERIES.iter().find(|s| s.id == id)
}

pub fn production_descriptor(id: &str) -> Option<&'static SeriesDescriptor> {
    DEFAULT_PRODUCTION_SERIES.iter().find(|s| s.id == id)
}

pub fn default_production_ids() -> Vec<String> {
    DEFAULT_PRODUCTION_SERIES.iter().map(|s| s.id.to_string()).collect()
}

/// Discovered states that are not already offered as defaults, in the
/// proxy's order.
pub fn addable_states(states: &[StateInfo]) -> Vec<StateInfo> {
    states
        .iter()
        .filter(|s| production_descriptor(&s.series_id).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(series_id: &str, area_name: &str) -> StateInfo {
        StateInfo {
            series_id: series_id.to_string(),
            duoarea: String::new(),
            area_name: area_name.to_string(),
        }
    }

    #[test]
    fn curve_ids_and_spot_are_catalogued() {
        assert!(price_descriptor(SPOT_SERIES_ID).is_some());
        for id in FUTURES_CURVE_IDS {
            assert!(price_descriptor(id).is_some(), "{} missing from catalog", id);
        }
        for id in DEFAULT_PRICE_SELECTION {
            assert!(price_descriptor(id).is_some());
        }
    }

    #[test]
    fn addable_states_skip_defaults_and_keep_order() {
        let states = vec![
            state("N9050AK2", "Alaska"),
            state("N9050TX2", "Texas"),
            state("N9050OK2", "Oklahoma"),
            state("N9050US2", "U.S."),
        ];

        let addable = addable_states(&states);
        let ids: Vec<&str> = addable.iter().map(|s| s.series_id.as_str()).collect();
        assert_eq!(ids, vec!["N9050AK2", "N9050OK2"]);
    }
}
