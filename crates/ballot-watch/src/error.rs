use crate::config::{ConfigError, ExerciseError};
use crate::report::{CsvImportError, ReportError};
use crate::scrape::{FetchError, ScrapeError};
use crate::telemetry::TelemetryError;
use crate::units::ParseError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Exercise(ExerciseError),
    Client(FetchError),
    Scrape(ScrapeError),
    Parse(ParseError),
    Report(ReportError),
    Import(CsvImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Exercise(err) => write!(f, "exercise error: {}", err),
            AppError::Client(err) => write!(f, "client error: {}", err),
            AppError::Scrape(err) => write!(f, "scrape error: {}", err),
            AppError::Parse(err) => write!(f, "parse error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Exercise(err) => Some(err),
            AppError::Client(err) => Some(err),
            AppError::Scrape(err) => Some(err),
            AppError::Parse(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Import(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ExerciseError> for AppError {
    fn from(value: ExerciseError) -> Self {
        Self::Exercise(value)
    }
}

impl From<FetchError> for AppError {
    fn from(value: FetchError) -> Self {
        Self::Client(value)
    }
}

impl From<ScrapeError> for AppError {
    fn from(value: ScrapeError) -> Self {
        Self::Scrape(value)
    }
}

impl From<ParseError> for AppError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<CsvImportError> for AppError {
    fn from(value: CsvImportError) -> Self {
        Self::Import(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::StatsError;
    use std::error::Error;

    #[test]
    fn display_prefixes_the_failing_stage() {
        let err = AppError::from(ReportError::from(StatsError::ZeroAvailableUnits {
            block: Some("107A".to_string()),
            flat_type: "4-Room".to_string(),
        }));

        assert!(err.to_string().starts_with("report error: "));
        assert!(err.to_string().contains("107A"));
        assert!(err.source().is_some());
    }
}
