//! Natural-gas dashboard backend: fetches price and production series from
//! the EIA proxy, merges them into chart-ready tables and publishes the
//! result of the newest request per view.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;
