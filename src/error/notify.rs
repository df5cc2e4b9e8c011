use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Notification delivery failures. Logged by the dispatcher, never returned to HTTP callers.
#[derive(Debug, ThisError)]
pub enum NotifyError {
    #[error("Notification account or credential missing")]
    NotConfigured,

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Mail relay rejected message with status {status}: {body:.200}")]
    RelayStatus { status: StatusCode, body: String },
}
