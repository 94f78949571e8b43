use std::sync::Weak;

use tokio::select;
use tokio::sync::{mpsc, watch};

use crate::Actor;
use crate::mailbox::{BoxedEnvelope, Mailbox};

/// Drives an actor until it is stopped or every strong handle is gone.
///
/// The state is dropped on this task when the loop ends, so anything the
/// state owns (timers, spawned tasks) is released together with the actor.
pub(crate) async fn run_actor<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut inbox: mpsc::UnboundedReceiver<BoxedEnvelope<S>>,
    mut stop_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        let envelope = select! {
            biased;

            _ = stop_rx.wait_for(|stopped| *stopped) => {
                debug!("stop requested");
                break;
            }
            envelope = inbox.recv() => {
                let Some(envelope) = envelope else {
                    break;
                };
                envelope
            }
        };
        trace!("received message: {envelope:?}");

        let Some(mailbox) = mailbox.upgrade() else {
            debug!("all handles dropped, discarding the message");
            break;
        };
        let actor = Actor::from_mailbox(mailbox);
        trace_span!("handle message").in_scope(|| {
            envelope.open(&mut state, &actor);
        });
    }
    inbox.close();
    drop(state);
    debug!("terminated");
}
