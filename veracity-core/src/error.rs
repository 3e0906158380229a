use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeracityError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Please enter an article to check")]
    EmptyInput,

    #[error("A check is already in progress")]
    Busy,

    #[error("An error occurred. Please try again.")]
    CheckFailed,

    #[error("Stored history under '{key}' is malformed: {reason}")]
    CorruptHistory { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, VeracityError>;
