mod series;
mod request;
pub mod catalog;

pub use series::{
    CurvePoint, CurveProjection, LatestValue, MergedRow, MergedTable, SeriesMetadata, SeriesPoint,
    SeriesResponse, StateInfo,
};
pub use request::{DateRange, Frequency, Limit, RequestParameters, PROXY_MAX_LIMIT};
pub use catalog::SeriesDescriptor;
