use serde::{Deserialize, Serialize};

use crate::BackendError;

/// A single chat turn sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
    /// Correlates requests of one conversation on the server side.
    pub session_id: String,
}

/// The backend's answer to a [`ChatRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's reply, usually markdown.
    pub reply: String,
}

/// A backend that answers chat messages.
///
/// Implementations should behave like stateless objects: the returned
/// futures must not borrow `self`, so that callers can drive them on their
/// own tasks.
pub trait ChatBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: BackendError;

    /// Sends one user message and waits for the complete reply.
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static;

    /// Fetches the greeting shown before the first user message.
    ///
    /// `Ok(None)` means the backend has no greeting configured.
    fn fetch_template(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static;
}
