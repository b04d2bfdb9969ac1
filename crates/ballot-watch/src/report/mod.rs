//! The three run artifacts: JSON snapshot, CSV table, and statistics log.

mod csv;
mod json;
mod stats;
mod writer;

pub use self::csv::{read_csv, read_csv_path, render_csv, CsvImportError};
pub use self::json::{format_timestamp, render_json};
pub use self::stats::{
    compute_stats, count_tuple, reconcile, render_log, BlockStats, HealthCheck, SelectionStat,
    StatsError, StatsReport, HEALTH_OK_MARKER,
};
pub use self::writer::{write_artifacts, ArtifactPaths, ReportError, RunReport};
