use crate::config::{AppConfig, BallotExercise};
use crate::error::AppError;
use crate::report::{write_artifacts, RunReport};
use crate::scrape::{collect_units, HttpPageSource, Pacing, PageSource};
use std::path::Path;
use tracing::warn;

/// Runs one exercise against the live availability service.
pub async fn run_exercise(
    config: &AppConfig,
    exercise: &BallotExercise,
) -> Result<RunReport, AppError> {
    let mut pages = HttpPageSource::new(
        exercise.url.as_str(),
        exercise.session_query(),
        config.http.timeout,
        &config.http.user_agent,
    )?;

    run_with(&mut pages, exercise, config.http.pacing(), &config.output.dir).await
}

/// Scrape, then write the JSON, CSV and log artifacts into `output_dir`.
pub async fn run_with<S: PageSource>(
    pages: &mut S,
    exercise: &BallotExercise,
    pacing: Pacing,
    output_dir: &Path,
) -> Result<RunReport, AppError> {
    exercise.validate()?;

    let snapshot = collect_units(pages, exercise, pacing).await?;
    let report = write_artifacts(output_dir, &snapshot, exercise)?;

    if !report.stats.is_matched() {
        warn!(stem = %exercise.output_stem, "retrieved totals differ from expected counts");
    }
    Ok(report)
}
