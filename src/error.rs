use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Missing metric family: {0}")]
    MissingMetric(String),

    #[error("Metric family {0} has no samples")]
    MissingSample(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StatsError {
    /// Name of the metric family behind a missing-data error.
    pub fn family(&self) -> Option<&str> {
        match self {
            StatsError::MissingMetric(name) | StatsError::MissingSample(name) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        StatsError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
