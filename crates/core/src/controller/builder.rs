use std::time::Duration;

use chatbot_actor::Actor;
use chatbot_backend::ChatBackend;
use tokio::sync::watch;

use super::state::{ControllerState, FetchGreeting};
use super::{ChatController, ChatStage, ChatView};
use crate::backend_client::BackendClient;
use crate::session_id::SessionId;

const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_FALLBACK_REPLY: &str =
    "Sorry, something went wrong. Please try again.";

/// [`ChatController`] builder.
pub struct ChatControllerBuilder {
    backend: BackendClient,
    session_id: Option<SessionId>,
    reveal_interval: Duration,
    request_timeout: Duration,
    fallback_reply: String,
    greeting: bool,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ChatControllerBuilder {
    /// Creates a new builder talking to the given backend.
    #[inline]
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        Self {
            backend: BackendClient::new(backend, DEFAULT_REQUEST_TIMEOUT),
            session_id: None,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_owned(),
            greeting: false,
            on_idle: None,
        }
    }

    /// Uses a fixed session id instead of generating one.
    #[inline]
    pub fn with_session_id<S: Into<SessionId>>(mut self, session_id: S) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the delay between two revealed characters.
    #[inline]
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Sets how long to wait for the backend before giving up.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the reply shown when the backend cannot be reached.
    #[inline]
    pub fn with_fallback_reply<S: Into<String>>(mut self, reply: S) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    /// Fetches and reveals the backend's greeting once the controller
    /// starts.
    #[inline]
    pub fn with_greeting(mut self, greeting: bool) -> Self {
        self.greeting = greeting;
        self
    }

    /// Attaches a callback to be invoked every time the controller becomes
    /// idle again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the controller and starts it on the current tokio runtime.
    pub fn build(self) -> ChatController {
        let Self {
            backend,
            session_id,
            reveal_interval,
            request_timeout,
            fallback_reply,
            greeting,
            on_idle,
        } = self;

        let session_id = session_id.unwrap_or_else(SessionId::generate);
        let stage = if greeting {
            ChatStage::Sending
        } else {
            ChatStage::Idle
        };
        let (view_tx, view_rx) = watch::channel(ChatView {
            stage,
            ..Default::default()
        });

        let state = ControllerState::new(
            backend.with_timeout(request_timeout),
            session_id.clone(),
            stage,
            reveal_interval,
            fallback_reply,
            view_tx,
            on_idle,
        );
        let actor = Actor::spawn(state, Some("chat controller"));
        if greeting {
            // A freshly spawned actor is always alive.
            actor.send(FetchGreeting).ok();
        }
        debug!(%session_id, "chat controller started");

        ChatController {
            actor,
            view_rx,
            session_id,
        }
    }
}
