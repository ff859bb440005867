use thiserror::Error;

/// Errors raised while loading or saving grid data
#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required map layer is absent
    #[error("map data is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid map size: {0}")]
    InvalidSize(i64),
}

pub type GridResult<T> = Result<T, GridError>;
