mod exercise;

pub use exercise::{BallotExercise, BlockPlan, ExerciseError, FLAT_SEARCH_URL, PRESET_NAMES};

use crate::scrape::Pacing;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level settings; the ballot exercise itself is a [`BallotExercise`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("BALLOT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let timeout_secs = parse_secs("BALLOT_REQUEST_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let max_delay_secs = parse_secs("BALLOT_MAX_DELAY_SECS", 3)?;
        let user_agent = env::var("BALLOT_USER_AGENT")
            .unwrap_or_else(|_| format!("ballot-watch/{}", env!("CARGO_PKG_VERSION")));

        let dir = env::var("BALLOT_OUTPUT_DIR").unwrap_or_else(|_| "data".to_string());
        let log_level = env::var("BALLOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            http: HttpConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_delay: Duration::from_secs(max_delay_secs),
                user_agent,
            },
            output: OutputConfig {
                dir: PathBuf::from(dir),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_secs(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings for talking to the availability service.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_delay: Duration,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing::new(self.max_delay)
    }
}

/// Where run artifacts are written.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str },
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a whole number of seconds")
            }
            ConfigError::ZeroTimeout => {
                write!(f, "BALLOT_REQUEST_TIMEOUT_SECS must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
