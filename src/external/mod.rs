pub mod transport;
pub mod series_source;
pub mod eia_prices;
pub mod eia_production;
