#[path = "../common/mod.rs"]
mod common;

mod test_analysis_service;
mod test_app_services;
mod test_drift_service;
mod test_guard_service;
