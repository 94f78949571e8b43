mod builder;
mod state;

use chatbot_actor::{Actor, ActorStoppedError};
use tokio::sync::watch;

use crate::input::KeyPress;
use crate::session_id::SessionId;
use crate::transcript::Transcript;
pub use builder::ChatControllerBuilder;
use state::{ControllerState, HandleKey, SendMessage, SetDraft};

/// Where the controller is in the current exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatStage {
    /// Waiting for input.
    #[default]
    Idle,
    /// Waiting for the backend.
    Sending,
    /// Animating a reply onto the transcript.
    Revealing,
}

/// Everything a front-end needs to draw the chat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatView {
    /// Committed messages.
    pub transcript: Transcript,
    /// The part of the reply revealed so far, while one is being animated.
    pub revealing: Option<String>,
    /// Text in the input box.
    pub draft: String,
    /// The current stage.
    pub stage: ChatStage,
}

impl ChatView {
    /// Returns `true` while waiting for the backend.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.stage == ChatStage::Sending
    }

    /// Returns `true` while a reply is being revealed.
    #[inline]
    pub fn is_typing(&self) -> bool {
        self.stage == ChatStage::Revealing
    }

    /// Returns `true` if the input accepts a new message.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        self.stage == ChatStage::Idle
    }
}

/// Drives one chat session: sends user messages to the backend and reveals
/// the replies with a typewriter effect.
///
/// All state lives on an actor task. Methods only enqueue requests, so
/// they never block, and their effects become visible through
/// [`ChatController::subscribe`] shortly after. Requests are handled in the
/// order they were made.
///
/// Dropping the last clone, or calling [`ChatController::dispose`], stops
/// the actor and cancels any pending request and reveal timer.
#[derive(Clone)]
pub struct ChatController {
    actor: Actor<ControllerState>,
    view_rx: watch::Receiver<ChatView>,
    session_id: SessionId,
}

impl ChatController {
    /// Sends a user message.
    ///
    /// Ignored if the text is blank or if the previous exchange has not
    /// finished yet. Surrounding whitespace is trimmed. The draft is
    /// cleared when the message is accepted.
    #[inline]
    pub fn send_message<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), ActorStoppedError> {
        self.actor.send(SendMessage(text.into()))
    }

    /// Replaces the text in the input box. Ignored while the input is
    /// disabled.
    #[inline]
    pub fn set_draft<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), ActorStoppedError> {
        self.actor.send(SetDraft(text.into()))
    }

    /// Handles a key press in the input box.
    ///
    /// Enter submits the draft as if passed to
    /// [`ChatController::send_message`]. Every other key, including
    /// Shift+Enter, leaves the draft alone.
    #[inline]
    pub fn handle_key(&self, press: KeyPress) -> Result<(), ActorStoppedError> {
        self.actor.send(HandleKey(press))
    }

    /// Returns the latest view.
    #[inline]
    pub fn view(&self) -> ChatView {
        self.view_rx.borrow().clone()
    }

    /// Returns a receiver notified on every view change.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.view_rx.clone()
    }

    /// Waits until the view satisfies `pred` and returns it.
    pub async fn wait_for(
        &self,
        pred: impl FnMut(&ChatView) -> bool,
    ) -> Result<ChatView, ActorStoppedError> {
        let mut view_rx = self.view_rx.clone();
        let view = view_rx.wait_for(pred).await.map_err(|_| ActorStoppedError)?;
        Ok(view.clone())
    }

    /// Returns the id sent with every request of this session.
    #[inline]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Stops the controller, cancelling pending work.
    #[inline]
    pub fn dispose(&self) {
        self.actor.stop();
    }

    /// Returns `true` once the controller has stopped.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.actor.is_stopped()
    }
}
