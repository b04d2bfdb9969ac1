pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod scrape;
pub mod telemetry;
pub mod units;
