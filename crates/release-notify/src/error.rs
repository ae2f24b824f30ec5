use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop a notification from being delivered.
///
/// Every variant is terminal for the process; nothing is retried.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required variable is missing or an optional one is malformed.
    #[error("{0}")]
    Configuration(String),

    /// The payload could not be encoded as JSON.
    #[error("encoding payload")]
    Serialization(#[from] serde_json::Error),

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error(transparent)]
    Transport(reqwest::Error),

    /// The endpoint answered with a status outside the success range.
    #[error("Error on message: {0}")]
    Delivery(StatusCode),
}

impl NotifyError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            NotifyError::Configuration(_) => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
