use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chatbot_backend::{BackendError, ChatBackend, ChatRequest, ErrorKind};
use tokio::time::timeout;
use tracing::Instrument;

pub(crate) type RequestResult<T> = Result<T, Box<dyn BackendError>>;
type BoxedFuture<T> = Pin<Box<dyn Future<Output = RequestResult<T>> + Send>>;
type SendMessageFn = Arc<dyn Fn(ChatRequest) -> BoxedFuture<String> + Send + Sync>;
type FetchTemplateFn = Arc<dyn Fn() -> BoxedFuture<Option<String>> + Send + Sync>;

/// A wrapper around a chat backend that erases its type and bounds every
/// call with a timeout.
#[derive(Clone)]
pub(crate) struct BackendClient {
    send_message_fn: SendMessageFn,
    fetch_template_fn: FetchTemplateFn,
    timeout: Duration,
}

impl BackendClient {
    pub fn new<B: ChatBackend + 'static>(backend: B, timeout: Duration) -> Self {
        // Both closures need the backend, so it is shared rather than moved.
        let backend = Arc::new(backend);

        let send_message_fn: SendMessageFn = {
            let backend = Arc::clone(&backend);
            Arc::new(move |req| {
                let fut = backend.send_message(&req);
                Box::pin(async move {
                    match fut.await {
                        Ok(reply) => Ok(reply.reply),
                        Err(err) => Err(Box::new(err) as Box<dyn BackendError>),
                    }
                })
            })
        };
        let fetch_template_fn: FetchTemplateFn = Arc::new(move || {
            let fut = backend.fetch_template();
            Box::pin(async move {
                fut.await
                    .map_err(|err| Box::new(err) as Box<dyn BackendError>)
            })
        });

        Self {
            send_message_fn,
            fetch_template_fn,
            timeout,
        }
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends a chat message and returns the reply text.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the request.
    pub async fn send_message(&self, req: ChatRequest) -> RequestResult<String> {
        trace!("sending: {req:?}");
        let fut = (self.send_message_fn)(req);
        self.bounded(fut)
            .instrument(trace_span!("chat request"))
            .await
    }

    /// Fetches the greeting template.
    pub async fn fetch_template(&self) -> RequestResult<Option<String>> {
        let fut = (self.fetch_template_fn)();
        self.bounded(fut)
            .instrument(trace_span!("template request"))
            .await
    }

    async fn bounded<T>(&self, fut: BoxedFuture<T>) -> RequestResult<T> {
        match timeout(self.timeout, fut).await {
            Ok(result) => {
                if let Err(err) = &result {
                    debug!("backend error: {err}");
                }
                result
            }
            Err(_) => Err(Box::new(Elapsed(self.timeout))),
        }
    }
}

impl Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// The backend did not answer within the configured time.
#[derive(Debug)]
struct Elapsed(Duration);

impl Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no response after {:?}", self.0)
    }
}

impl Error for Elapsed {}

impl BackendError for Elapsed {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use chatbot_test_backend::{PresetReply, TestBackend};

    use super::*;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_owned(),
            session_id: "session_1".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_send_message() {
        let backend = TestBackend::default();
        backend.push_reply(PresetReply::reply("Hai!"));
        backend.set_template(Some("Halo!"));

        let client = BackendClient::new(backend.clone(), Duration::from_secs(1));
        assert_eq!(client.send_message(request("Halo")).await.unwrap(), "Hai!");
        assert_eq!(
            client.fetch_template().await.unwrap().as_deref(),
            Some("Halo!")
        );
        assert_eq!(backend.requests(), [request("Halo")]);
    }

    #[tokio::test]
    async fn test_error_kind_survives_erasure() {
        let backend = TestBackend::default();
        backend.push_reply(PresetReply::Status(503));
        let client = BackendClient::new(backend, Duration::from_secs(1));
        let err = client.send_message(request("Halo")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let backend = TestBackend::default();
        backend.push_reply(PresetReply::Hang);
        let client = BackendClient::new(backend, Duration::from_secs(5));
        let err = client.send_message(request("Halo")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
