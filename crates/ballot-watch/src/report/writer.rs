use super::csv::render_csv;
use super::json::render_json;
use super::stats::{compute_stats, render_log, StatsError, StatsReport};
use crate::config::BallotExercise;
use crate::scrape::RunSnapshot;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not serialize units to JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not serialize units to CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locations of the three artifacts for one output stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub log: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            json: dir.join(format!("{stem}.json")),
            csv: dir.join(format!("{stem}.csv")),
            log: dir.join(format!("{stem}.log")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub paths: ArtifactPaths,
    pub stats: StatsReport,
}

/// Renders all three artifacts and only then writes them, each through a
/// temporary file renamed into place. Nothing is written when rendering fails.
pub fn write_artifacts(
    dir: &Path,
    snapshot: &RunSnapshot,
    exercise: &BallotExercise,
) -> Result<RunReport, ReportError> {
    let json = render_json(snapshot)?;
    let csv = render_csv(&snapshot.units)?;
    let stats = compute_stats(&snapshot.units, exercise)?;
    let log = render_log(&stats, &snapshot.timestamp.with_timezone(&Local));

    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = ArtifactPaths::new(dir, &exercise.output_stem);
    replace_file(dir, &paths.json, json.as_bytes())?;
    replace_file(dir, &paths.csv, &csv)?;
    replace_file(dir, &paths.log, log.as_bytes())?;

    info!(
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        log = %paths.log.display(),
        matched = stats.is_matched(),
        "artifacts written"
    );

    Ok(RunReport { paths, stats })
}

fn replace_file(dir: &Path, target: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io = |source: std::io::Error| ReportError::Io {
        path: target.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io)?;
    file.write_all(contents).map_err(io)?;
    file.as_file().sync_all().map_err(io)?;
    file.persist(target).map_err(|err| io(err.error))?;
    Ok(())
}
