pub mod dataset;
pub mod run_report;
