use std::sync::{Arc, Weak};

use tracing::Instrument;

use crate::mailbox::{Mailbox, MailboxParts};
use crate::scheduler::run_actor;
use crate::{ActorStoppedError, Message};

/// Strong handle to an actor.
///
/// The actor keeps running while at least one strong handle exists, or
/// until [`Actor::stop`] is called.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + 'static> Actor<S> {
    /// Spawns a new actor owning `state` on the current tokio runtime.
    ///
    /// `label` is attached to the actor's tracing span.
    pub fn spawn(state: S, label: Option<&str>) -> Self {
        let MailboxParts {
            mailbox,
            inbox,
            stop_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_actor(Arc::downgrade(&mailbox), state, inbox, stop_rx)
                .instrument(trace_span!("actor", label = label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    /// Sends a message to the actor.
    #[inline]
    pub fn send<M: Message<S>>(&self, msg: M) -> Result<(), ActorStoppedError> {
        self.mailbox.post(Box::new(msg))
    }

    /// Asks the actor to stop.
    ///
    /// Messages already queued are discarded. The state is dropped shortly
    /// after on the actor's task.
    #[inline]
    pub fn stop(&self) {
        self.mailbox.stop();
    }

    /// Returns `true` if the actor no longer accepts messages.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.mailbox.is_stopped()
    }

    /// Creates a handle that does not keep the actor alive.
    #[inline]
    pub fn downgrade(&self) -> WeakActor<S> {
        WeakActor {
            mailbox: Arc::downgrade(&self.mailbox),
        }
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}

/// Weak handle to an actor, for background tasks that report back to it.
pub struct WeakActor<S> {
    mailbox: Weak<Mailbox<S>>,
}

impl<S: Send + 'static> WeakActor<S> {
    /// Sends a message if the actor is still alive.
    #[inline]
    pub fn send<M: Message<S>>(&self, msg: M) -> Result<(), ActorStoppedError> {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return Err(ActorStoppedError);
        };
        mailbox.post(Box::new(msg))
    }
}

impl<S> Clone for WeakActor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Weak::clone(&self.mailbox),
        }
    }
}
