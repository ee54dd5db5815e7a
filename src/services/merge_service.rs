//! Pure transformations from fetched series into chart-ready structures.
//!
//! Nothing here performs I/O. Values pass through untouched: rounding and
//! formatting belong to whoever renders them.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{CurvePoint, CurveProjection, LatestValue, MergedRow, MergedTable, SeriesResponse};
use crate::models::catalog::price_descriptor;

/// Combine independent series into one sparse, date-sorted table.
///
/// A duplicate `(series, date)` pair inside one response keeps the first
/// point in that response's order; later duplicates are logged and dropped.
pub fn merge_by_date<'a, I>(responses: I) -> MergedTable
where
    I: IntoIterator<Item = &'a SeriesResponse>,
{
    // BTreeMap keeps rows keyed and ordered by the date string.
    let mut rows: BTreeMap<&str, MergedRow> = BTreeMap::new();

    for response in responses {
        for point in &response.points {
            let row = rows
                .entry(point.date.as_str())
                .or_insert_with(|| MergedRow::new(point.date.clone()));

            match row.values.entry(response.series_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(point.value);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        "Duplicate point for {} on {} ({} kept, {} dropped)",
                        response.series_id,
                        point.date,
                        existing.get(),
                        point.value
                    );
                }
            }
        }
    }

    rows.into_values().collect()
}

/// Index latest values by series id. A repeated id keeps the last entry.
pub fn snapshot_latest<I>(latest_values: I) -> BTreeMap<String, LatestValue>
where
    I: IntoIterator<Item = LatestValue>,
{
    latest_values
        .into_iter()
        .map(|lv| (lv.series_id.clone(), lv))
        .collect()
}

/// Latest values of the selected series, in selection order. Series without
/// a latest value are skipped.
pub fn select_latest(latest: &BTreeMap<String, LatestValue>, series_ids: &[String]) -> Vec<LatestValue> {
    series_ids
        .iter()
        .filter_map(|id| latest.get(id).cloned())
        .collect()
}

/// Lay out the latest values of `curve_ids` in the given order.
///
/// Ids without a latest value become `0.0` with `resolved = false`; the caller
/// decides whether to draw them. The reference series, if known, is returned
/// separately and never injected into the curve points.
pub fn project_curve(
    latest: &BTreeMap<String, LatestValue>,
    curve_ids: &[&str],
    reference_id: Option<&str>,
) -> CurveProjection {
    let points = curve_ids
        .iter()
        .map(|id| {
            let label = price_descriptor(id)
                .map(|d| d.label.to_string())
                .unwrap_or_else(|| id.to_string());

            match latest.get(*id) {
                Some(lv) => CurvePoint {
                    label,
                    series_id: id.to_string(),
                    value: lv.value,
                    resolved: true,
                },
                None => CurvePoint {
                    label,
                    series_id: id.to_string(),
                    value: 0.0,
                    resolved: false,
                },
            }
        })
        .collect();

    let reference = reference_id.and_then(|id| latest.get(id).cloned());

    CurveProjection { points, reference }
}
