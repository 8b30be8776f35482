use chrono::Duration;
use std::env;
use std::path::PathBuf;

use crate::stats::ACTIVE_CLIENT_WINDOW_SECS;
use crate::{Result, StatsError};

pub const INPUT_ENV: &str = "STATS_INPUT";
pub const ACTIVE_WINDOW_ENV: &str = "STATS_ACTIVE_WINDOW_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    /// JSON family map to read; stdin when unset.
    pub input: Option<PathBuf>,
    pub active_window: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            input: None,
            active_window: Duration::seconds(ACTIVE_CLIENT_WINDOW_SECS),
        }
    }
}

impl StatsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(INPUT_ENV).filter(|p| !p.is_empty()) {
            config.input = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup(ACTIVE_WINDOW_ENV) {
            let secs: i64 = raw.trim().parse().map_err(|e| {
                StatsError::Config(format!(
                    "{} must be an integer, got {:?}: {}",
                    ACTIVE_WINDOW_ENV, raw, e
                ))
            })?;
            if secs <= 0 {
                return Err(StatsError::Config(format!(
                    "{} must be positive, got {}",
                    ACTIVE_WINDOW_ENV, secs
                )));
            }
            config.active_window = Duration::try_seconds(secs).ok_or_else(|| {
                StatsError::Config(format!("{} out of range: {}", ACTIVE_WINDOW_ENV, secs))
            })?;
        }

        Ok(config)
    }
}
