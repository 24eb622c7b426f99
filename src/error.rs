use thiserror::Error;

/// Terminal outcome of a single failed relay attempt.
///
/// Each variant is final for the event that produced it; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Signing error: {0}")]
    SigningError(String),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Server rejected payment event with status {status}")]
    ServerRejected { status: u16 },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid amount pattern: {0}")]
    PatternError(#[from] regex::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
    #[error("Dispatcher is no longer accepting payment events")]
    DispatcherClosed,
    #[error(transparent)]
    Relay(#[from] RelayError),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
