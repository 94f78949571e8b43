use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::{Actor, Message};

/// Shortest period a [`Ticker`] runs at.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// A repeating timer that posts a message to an actor on every tick.
///
/// The timer holds only a weak reference to the actor. It is cancelled by
/// [`Ticker::cancel`], when it is dropped, or when the actor goes away.
#[derive(Debug)]
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    /// Starts a timer whose first tick fires one `period` from now.
    ///
    /// Periods shorter than [`MIN_TICK_PERIOD`], including zero, are
    /// raised to it.
    pub fn start<S, M, F>(actor: &Actor<S>, period: Duration, mut make_msg: F) -> Self
    where
        S: Send + 'static,
        M: Message<S>,
        F: FnMut() -> M + Send + 'static,
    {
        let period = period.max(MIN_TICK_PERIOD);
        let actor = actor.downgrade();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if actor.send(make_msg()).is_err() {
                    trace!("actor is gone, timer exits");
                    break;
                }
            }
        });
        Self { task }
    }

    /// Cancels the timer. Ticks already delivered are not recalled.
    #[inline]
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` once the timer task has exited.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
