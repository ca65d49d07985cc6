use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required environment variable: {name}")]
    MissingCredential { name: String },

    #[error("Source '{src}' failed: {message}")]
    Source { src: String, message: String },

    #[error("Member '{name}': start_date must fall before leave_date")]
    InvalidMemberDates { name: String },

    #[error("Team '{name}' not found")]
    TeamNotFound { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
