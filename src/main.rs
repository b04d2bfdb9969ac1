use ballot_watch::config::{AppConfig, BallotExercise};
use ballot_watch::error::AppError;
use ballot_watch::report::{compute_stats, read_csv_path, render_log, ReportError, StatsReport};
use ballot_watch::runner::run_exercise;
use ballot_watch::telemetry;
use ballot_watch::units::parse_units;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "ballot-watch",
    about = "Scrape and reconcile unit availability for BTO ballot exercises",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every block and flat type of an exercise and write JSON, CSV and log artifacts
    Scrape(ScrapeArgs),
    /// Parse a saved availability page and print its units as JSON
    Parse(ParseArgs),
    /// Recompute the statistics log from a previously written CSV
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ExerciseArgs {
    /// JSON file describing the ballot exercise
    #[arg(long)]
    exercise: Option<PathBuf>,
    /// Built-in exercise (bidadari-2015-11, bidadari-2016-02)
    #[arg(long)]
    preset: Option<String>,
}

impl ExerciseArgs {
    fn load(&self) -> Result<BallotExercise, AppError> {
        let exercise = match (&self.exercise, &self.preset) {
            (Some(path), _) => BallotExercise::from_path(path)?,
            (None, preset) => BallotExercise::preset(preset.as_deref().unwrap_or_default())?,
        };
        Ok(exercise.sorted())
    }
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    #[command(flatten)]
    source: ExerciseArgs,
    /// Override BALLOT_OUTPUT_DIR
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Override BALLOT_MAX_DELAY_SECS
    #[arg(long)]
    max_delay: Option<u64>,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Saved response page
    #[arg(long)]
    html: PathBuf,
    /// Block to assign to every parsed unit
    #[arg(long, default_value = "")]
    block: String,
    /// Flat type to assign to every parsed unit
    #[arg(long, default_value = "")]
    flat_type: String,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Unit table written by a previous scrape
    #[arg(long)]
    csv: PathBuf,
    #[command(flatten)]
    source: ExerciseArgs,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Scrape(args) => {
            if let Some(dir) = args.output_dir {
                config.output.dir = dir;
            }
            if let Some(secs) = args.max_delay {
                config.http.max_delay = Duration::from_secs(secs);
            }
            run_scrape(&config, &args.source).await
        }
        Command::Parse(args) => run_parse(args),
        Command::Stats(args) => run_stats(args),
    }
}

async fn run_scrape(config: &AppConfig, source: &ExerciseArgs) -> Result<(), AppError> {
    let exercise = source.load()?;
    info!(?config.environment, stem = %exercise.output_stem, "ballot exercise loaded");

    let report = run_exercise(config, &exercise).await?;

    println!("Wrote {}", report.paths.json.display());
    println!("Wrote {}", report.paths.csv.display());
    println!("Wrote {}", report.paths.log.display());
    println!("Health check: {}", health_label(&report.stats));
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), AppError> {
    let html = std::fs::read_to_string(&args.html)?;
    let units: Vec<_> = parse_units(&html)?
        .into_iter()
        .map(|unit| unit.placed(args.block.as_str(), args.flat_type.as_str()))
        .collect();

    let json = serde_json::to_string_pretty(&units).map_err(ReportError::from)?;
    println!("{json}");
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let exercise = args.source.load()?;
    let units = read_csv_path(&args.csv)?;
    let stats = compute_stats(&units, &exercise).map_err(ReportError::from)?;

    print!("{}", render_log(&stats, &Local::now()));
    Ok(())
}

fn health_label(stats: &StatsReport) -> &'static str {
    if stats.is_matched() {
        "totals match expected counts"
    } else {
        "totals differ from expected counts, statistics withheld"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exercise_and_preset_are_mutually_exclusive() {
        let err = Cli::try_parse_from([
            "ballot-watch",
            "scrape",
            "--preset",
            "bidadari-2016-02",
            "--exercise",
            "exercise.json",
        ])
        .expect_err("conflicting sources");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn scrape_requires_an_exercise_source() {
        let err = Cli::try_parse_from(["ballot-watch", "scrape"]).expect_err("missing source");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn preset_scrape_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "ballot-watch",
            "scrape",
            "--preset",
            "bidadari-2015-11",
            "--output-dir",
            "out",
            "--max-delay",
            "0",
        ])
        .expect("parses");

        match cli.command {
            Command::Scrape(args) => {
                assert_eq!(args.max_delay, Some(0));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                let exercise = args.source.load().expect("preset loads");
                assert_eq!(exercise.output_stem, "bidadari");
            }
            other => panic!("expected scrape, got {other:?}"),
        }
    }
}
