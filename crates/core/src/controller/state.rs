use std::time::Duration;

use chatbot_actor::{Actor, Message as ActorMessage, Ticker};
use chatbot_backend::ChatRequest;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{ChatStage, ChatView};
use crate::backend_client::{BackendClient, RequestResult};
use crate::input::KeyPress;
use crate::session_id::SessionId;
use crate::transcript::{Message, Transcript};
use crate::typewriter::Typewriter;

/// A reply being revealed, with the timer driving it.
struct Reveal {
    id: u64,
    typewriter: Typewriter,
    ticker: Ticker,
}

pub(crate) struct ControllerState {
    backend: BackendClient,
    session_id: SessionId,
    transcript: Transcript,
    draft: String,
    stage: ChatStage,
    reveal: Option<Reveal>,
    next_reveal_id: u64,
    reveal_interval: Duration,
    fallback_reply: String,
    pending_request: Option<JoinHandle<()>>,
    view_tx: watch::Sender<ChatView>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerState {
    pub fn new(
        backend: BackendClient,
        session_id: SessionId,
        stage: ChatStage,
        reveal_interval: Duration,
        fallback_reply: String,
        view_tx: watch::Sender<ChatView>,
        on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    ) -> Self {
        Self {
            backend,
            session_id,
            transcript: Default::default(),
            draft: Default::default(),
            stage,
            reveal: None,
            next_reveal_id: 1,
            reveal_interval,
            fallback_reply,
            pending_request: None,
            view_tx,
            on_idle,
        }
    }

    fn submit(&mut self, text: &str, handle: &Actor<Self>) {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank input");
            return;
        }
        if self.stage != ChatStage::Idle {
            debug!(stage = ?self.stage, "ignoring input while busy");
            return;
        }

        // The prompt is on the transcript before the request goes out.
        self.transcript.push(Message::user(text));
        self.draft.clear();
        self.stage = ChatStage::Sending;
        self.publish();

        let request = ChatRequest {
            message: text.to_owned(),
            session_id: self.session_id.to_string(),
        };
        let backend = self.backend.clone();
        let handle = handle.downgrade();
        self.spawn_request(async move {
            let result = backend.send_message(request).await;
            handle.send(ChatRequestFinished(result)).ok();
        });
    }

    fn fetch_greeting(&mut self, handle: &Actor<Self>) {
        self.stage = ChatStage::Sending;
        self.publish();

        let backend = self.backend.clone();
        let handle = handle.downgrade();
        self.spawn_request(async move {
            let result = backend.fetch_template().await;
            handle.send(GreetingFetched(result)).ok();
        });
    }

    fn spawn_request<Fut>(&mut self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(fut);
        if let Some(previous) = self.pending_request.replace(task) {
            // Only one request is ever in flight.
            warn!("replacing an unfinished request");
            previous.abort();
        }
    }

    fn start_reveal(&mut self, text: String, handle: &Actor<Self>) {
        debug_assert!(self.reveal.is_none(), "a reveal is already running");

        let id = self.next_reveal_id;
        self.next_reveal_id += 1;

        let ticker = Ticker::start(handle, self.reveal_interval, move || RevealTick(id));
        self.reveal = Some(Reveal {
            id,
            typewriter: Typewriter::new(text),
            ticker,
        });
        self.stage = ChatStage::Revealing;
        self.publish();
    }

    fn tick(&mut self, id: u64) {
        let Some(reveal) = &mut self.reveal else {
            trace!("tick without a reveal");
            return;
        };
        if reveal.id != id {
            trace!("stale tick from reveal {id}");
            return;
        }

        // The full text stays on screen for one tick before it is
        // committed.
        if reveal.typewriter.advance() {
            self.publish();
        } else {
            self.finish_reveal();
        }
    }

    fn finish_reveal(&mut self) {
        let Some(reveal) = self.reveal.take() else {
            return;
        };
        reveal.ticker.cancel();
        self.transcript
            .push(Message::assistant(reveal.typewriter.into_text()));
        self.become_idle();
    }

    fn become_idle(&mut self) {
        self.stage = ChatStage::Idle;
        self.publish();
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn publish(&self) {
        let view = ChatView {
            transcript: self.transcript.clone(),
            revealing: self
                .reveal
                .as_ref()
                .map(|reveal| reveal.typewriter.revealed().to_owned()),
            draft: self.draft.clone(),
            stage: self.stage,
        };
        self.view_tx.send_replace(view);
    }
}

impl Drop for ControllerState {
    fn drop(&mut self) {
        // The ticker aborts itself on drop, the request task does not.
        if let Some(task) = self.pending_request.take() {
            task.abort();
        }
        debug!(session_id = %self.session_id, "chat controller stopped");
    }
}

#[derive(Debug)]
pub struct SendMessage(pub String);

impl ActorMessage<ControllerState> for SendMessage {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.submit(&self.0, handle);
    }
}

#[derive(Debug)]
pub struct SetDraft(pub String);

impl ActorMessage<ControllerState> for SetDraft {
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        if state.stage != ChatStage::Idle {
            return;
        }
        state.draft = self.0;
        state.publish();
    }
}

#[derive(Debug)]
pub struct HandleKey(pub KeyPress);

impl ActorMessage<ControllerState> for HandleKey {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        if !self.0.submits() {
            return;
        }
        let draft = state.draft.clone();
        state.submit(&draft, handle);
    }
}

#[derive(Debug)]
pub struct FetchGreeting;

impl ActorMessage<ControllerState> for FetchGreeting {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.fetch_greeting(handle);
    }
}

#[derive(Debug)]
struct ChatRequestFinished(RequestResult<String>);

impl ActorMessage<ControllerState> for ChatRequestFinished {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.pending_request = None;
        if state.stage != ChatStage::Sending {
            warn!(stage = ?state.stage, "unexpected chat reply, dropped");
            return;
        }

        let reply = match self.0 {
            Ok(reply) => reply,
            Err(err) => {
                warn!(kind = %err.kind(), "chat request failed: {err}");
                state.fallback_reply.clone()
            }
        };
        state.start_reveal(reply, handle);
    }
}

#[derive(Debug)]
struct GreetingFetched(RequestResult<Option<String>>);

impl ActorMessage<ControllerState> for GreetingFetched {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.pending_request = None;
        if state.stage != ChatStage::Sending {
            warn!(stage = ?state.stage, "unexpected greeting, dropped");
            return;
        }

        match self.0 {
            Ok(Some(greeting)) if !greeting.trim().is_empty() => {
                state.start_reveal(greeting, handle);
            }
            Ok(_) => {
                debug!("no greeting configured");
                state.become_idle();
            }
            Err(err) => {
                warn!(kind = %err.kind(), "failed to fetch the greeting: {err}");
                state.become_idle();
            }
        }
    }
}

#[derive(Debug)]
struct RevealTick(u64);

impl ActorMessage<ControllerState> for RevealTick {
    #[inline]
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        state.tick(self.0);
    }
}
