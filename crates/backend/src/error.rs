use std::error::Error;
use std::fmt::{self, Display};

/// The kind of error that occurred while talking to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, connection, TLS...).
    Transport,
    /// The request did not complete in time.
    Timeout,
    /// The backend answered with a non-success status.
    Status(u16),
    /// The credentials or API key were rejected.
    Unauthorized,
    /// The response body could not be understood.
    InvalidPayload,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Timeout => write!(f, "request timed out"),
            ErrorKind::Status(code) => write!(f, "unexpected status {code}"),
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::InvalidPayload => write!(f, "invalid payload"),
            ErrorKind::Other => write!(f, "other error"),
        }
    }
}

/// The error type returned by backend implementations.
pub trait BackendError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns the human-readable reason the backend gave, if any.
    ///
    /// For HTTP backends this is the `detail` field of the error body.
    fn detail(&self) -> Option<&str> {
        None
    }
}
