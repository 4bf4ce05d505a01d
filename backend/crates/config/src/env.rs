use cadence_common::error::{CadenceError, CadenceResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Upper bound for `STUCK_TASK_DAYS`; anything longer than a year is a typo.
pub const MAX_STUCK_TASK_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub stuck_task_days: i64,
    pub lookback_sprints: usize,
    pub standard_capacity_points: f64,
    pub iteration_fixture: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present; every var has a default.
    pub fn from_env() -> CadenceResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let config = Self {
            log_level: get_var_or("LOG_LEVEL", "info"),
            stuck_task_days: parse_var_or("STUCK_TASK_DAYS", 2)?,
            lookback_sprints: parse_var_or("LOOKBACK_SPRINTS", 3)?,
            standard_capacity_points: parse_var_or("STANDARD_CAPACITY_POINTS", 20.0)?,
            iteration_fixture: env::var("ITERATION_FIXTURE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Range checks on values that parsed but make no sense.
    fn validate(&self) -> CadenceResult<()> {
        if !(0..=MAX_STUCK_TASK_DAYS).contains(&self.stuck_task_days) {
            return Err(CadenceError::Validation(format!(
                "STUCK_TASK_DAYS must be between 0 and {MAX_STUCK_TASK_DAYS}"
            )));
        }
        if self.lookback_sprints == 0 {
            return Err(CadenceError::Validation(
                "LOOKBACK_SPRINTS must be at least 1".to_owned(),
            ));
        }
        if self.standard_capacity_points <= 0.0 || !self.standard_capacity_points.is_finite() {
            return Err(CadenceError::Validation(
                "STANDARD_CAPACITY_POINTS must be a positive number".to_owned(),
            ));
        }
        Ok(())
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var_or<T>(key: &str, default: T) -> CadenceResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CadenceError::Config(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
