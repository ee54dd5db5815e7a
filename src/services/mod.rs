pub mod merge_service;
pub mod orchestrator;
pub mod price_data_service;
pub mod production_data_service;
pub mod dashboard_service;
