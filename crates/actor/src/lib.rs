//! A lightweight actor runtime for single-owner UI state.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;
mod timer;

pub use error::ActorStoppedError;
pub use handle::{Actor, WeakActor};
pub use mailbox::Message;
pub use timer::{MIN_TICK_PERIOD, Ticker};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
        ticker: Option<Ticker>,
        dropped: Option<Arc<AtomicBool>>,
    }

    impl Drop for Counter {
        fn drop(&mut self) {
            if let Some(dropped) = &self.dropped {
                dropped.store(true, Ordering::SeqCst);
            }
        }
    }

    #[derive(Debug)]
    struct Add(u32);

    impl Message<Counter> for Add {
        fn handle(self, state: &mut Counter, _actor: &Actor<Counter>) {
            state.value += self.0;
        }
    }

    #[derive(Debug)]
    struct Get(oneshot::Sender<u32>);

    impl Message<Counter> for Get {
        fn handle(self, state: &mut Counter, _actor: &Actor<Counter>) {
            self.0.send(state.value).unwrap();
        }
    }

    #[derive(Debug)]
    struct StartTicking;

    impl Message<Counter> for StartTicking {
        fn handle(self, state: &mut Counter, actor: &Actor<Counter>) {
            state.ticker = Some(Ticker::start(actor, Duration::from_millis(10), || Add(1)));
        }
    }

    #[derive(Debug)]
    struct StopTicking;

    impl Message<Counter> for StopTicking {
        fn handle(self, state: &mut Counter, _actor: &Actor<Counter>) {
            if let Some(ticker) = state.ticker.take() {
                ticker.cancel();
            }
        }
    }

    async fn get(actor: &Actor<Counter>) -> u32 {
        let (tx, rx) = oneshot::channel();
        actor.send(Get(tx)).unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_send_message() {
        let actor = Actor::spawn(Counter::default(), None);
        actor.send(Add(42)).unwrap();
        assert_eq!(get(&actor).await, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_until_cancelled() {
        let actor = Actor::spawn(Counter::default(), Some("counter"));
        actor.send(StartTicking).unwrap();

        tokio::time::sleep(Duration::from_millis(35)).await;
        actor.send(StopTicking).unwrap();
        let ticks = get(&actor).await;
        assert_eq!(ticks, 3);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(get(&actor).await, ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_still_ticks() {
        let actor = Actor::spawn(Counter::default(), None);
        let ticker = Ticker::start(&actor, Duration::ZERO, || Add(1));

        tokio::time::sleep(Duration::from_millis(5)).await;
        ticker.cancel();
        let ticks = get(&actor).await;
        assert!(ticks >= 4, "only {ticks} ticks");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_exits_with_actor() {
        let actor = Actor::spawn(Counter::default(), None);
        let ticker = Ticker::start(&actor, Duration::from_millis(10), || Add(1));
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert_eq!(get(&actor).await, 1);
        assert!(!ticker.is_finished());

        drop(actor);
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_ticker_finishes() {
        let actor = Actor::spawn(Counter::default(), None);
        let ticker = Ticker::start(&actor, Duration::from_millis(10), || Add(1));
        ticker.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(ticker.is_finished());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(get(&actor).await, 0);
    }

    #[tokio::test]
    async fn test_stop_drops_state() {
        let dropped = Arc::new(AtomicBool::new(false));
        let actor = Actor::spawn(
            Counter {
                value: 0,
                ticker: None,
                dropped: Some(Arc::clone(&dropped)),
            },
            None,
        );
        actor.stop();
        assert!(actor.is_stopped());
        assert!(actor.send(Add(1)).is_err());

        for _ in 0..10 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_weak_handle_does_not_keep_alive() {
        let dropped = Arc::new(AtomicBool::new(false));
        let actor = Actor::spawn(
            Counter {
                value: 0,
                ticker: None,
                dropped: Some(Arc::clone(&dropped)),
            },
            None,
        );
        let weak = actor.downgrade();
        weak.send(Add(1)).unwrap();
        assert_eq!(get(&actor).await, 1);

        drop(actor);
        assert!(weak.send(Add(1)).is_err());
        for _ in 0..10 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}
