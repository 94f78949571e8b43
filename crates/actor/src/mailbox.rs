use std::fmt::Debug;

use tokio::sync::{mpsc, watch};

use crate::{Actor, ActorStoppedError};

/// A message that an actor can handle.
///
/// Handlers run one at a time on the actor's task, with exclusive access to
/// the actor's state. They must not block.
pub trait Message<S>: Send + Debug + 'static {
    /// Handles the message with mutable access to the actor's state.
    fn handle(self, state: &mut S, actor: &Actor<S>);
}

/// Object-safe form of [`Message`], used to queue heterogeneous messages.
pub(crate) trait Envelope<S>: Send + Debug {
    fn open(self: Box<Self>, state: &mut S, actor: &Actor<S>);
}

impl<S, M: Message<S>> Envelope<S> for M {
    #[inline]
    fn open(self: Box<Self>, state: &mut S, actor: &Actor<S>) {
        (*self).handle(state, actor)
    }
}

pub(crate) type BoxedEnvelope<S> = Box<dyn Envelope<S>>;

pub(crate) struct MailboxParts<S> {
    pub mailbox: Mailbox<S>,
    pub inbox: mpsc::UnboundedReceiver<BoxedEnvelope<S>>,
    pub stop_rx: watch::Receiver<bool>,
}

/// The sending half of an actor. Dropping the last one ends the actor.
pub(crate) struct Mailbox<S> {
    outbox: mpsc::UnboundedSender<BoxedEnvelope<S>>,
    stop_tx: watch::Sender<bool>,
}

impl<S: Send + 'static> Mailbox<S> {
    #[inline]
    pub fn new() -> MailboxParts<S> {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        MailboxParts {
            mailbox: Mailbox { outbox, stop_tx },
            inbox,
            stop_rx,
        }
    }

    #[inline]
    pub fn post(&self, envelope: BoxedEnvelope<S>) -> Result<(), ActorStoppedError> {
        if self.is_stopped() {
            return Err(ActorStoppedError);
        }
        self.outbox.send(envelope).map_err(|_| ActorStoppedError)
    }

    #[inline]
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow() || self.outbox.is_closed()
    }
}
