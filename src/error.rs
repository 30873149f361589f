use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Lane not found: {0}")]
    LaneNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Missing required fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("{0}")]
    Other(String),
}

impl DashError {
    /// True for errors caused by operator input rather than the environment
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidDate(_)
                | Self::InvalidValue(_)
                | Self::RecordNotFound(_)
                | Self::CardNotFound(_)
                | Self::LaneNotFound(_)
                | Self::EventNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }
}
