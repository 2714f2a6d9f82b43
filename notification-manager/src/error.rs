use crate::types::Capability;
use thiserror::Error;

/// Errors reported by a notification center implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CenterError {
    #[error("notifications are not allowed for this application")]
    NotAllowed,
    #[error("invalid notification trigger")]
    InvalidTrigger,
    #[error("badge count is not supported by this notification center")]
    BadgeUnsupported,
    #[error("{0}")]
    Platform(String),
}

/// Errors surfaced by the facade when the caller asks for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("notification authorization denied")]
    AuthorizationDenied,
    #[error("failed to submit notification request: {0}")]
    SubmissionFailed(#[source] CenterError),
    #[error("{0} is not available on this platform")]
    NotAvailable(Capability),
    #[error("no pending notification request with id '{0}'")]
    NoSuchPendingRequest(String),
    #[error("no async runtime available to run {0}")]
    NoRuntime(&'static str),
}

impl From<CenterError> for NotificationError {
    fn from(err: CenterError) -> Self {
        match err {
            CenterError::NotAllowed => NotificationError::AuthorizationDenied,
            CenterError::BadgeUnsupported => NotificationError::NotAvailable(Capability::BadgeCount),
            other => NotificationError::SubmissionFailed(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotificationError>;
