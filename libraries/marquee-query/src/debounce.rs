//! Debounced values.
//!
//! A [`Debounced`] follows an input channel but only takes on a new value
//! once the input has stayed unchanged for the configured delay. Each input
//! change restarts the timer and replaces whatever was pending.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default delay for search input in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Output side of a debounced input.
///
/// Dropping it cancels the timer; a pending value is never emitted after
/// teardown.
#[derive(Debug)]
pub struct Debounced<T> {
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start following `input`. The output starts at the input's current value.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(mut input: watch::Receiver<T>, delay: Duration) -> Self {
        let initial = input.borrow_and_update().clone();
        let (tx, output) = watch::channel(initial);
        let task = tokio::spawn(follow(input, tx, delay));

        Self { output, task }
    }

    /// Latest settled value
    pub fn get(&self) -> T {
        self.output.borrow().clone()
    }

    /// Wait for the next settled value.
    ///
    /// Returns `None` once the input side is gone and nothing more can settle.
    pub async fn changed(&mut self) -> Option<T> {
        self.output.changed().await.ok()?;
        Some(self.output.borrow_and_update().clone())
    }

    /// Another handle on the settled output
    pub fn receiver(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn follow<T>(mut input: watch::Receiver<T>, output: watch::Sender<T>, delay: Duration)
where
    T: Clone + PartialEq,
{
    loop {
        if input.changed().await.is_err() {
            return;
        }

        // Restart the timer on every change until the input goes quiet
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        debug!("Debounce input closed with a value pending");
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let settled = input.borrow_and_update().clone();
        output.send_if_modified(|current| {
            if *current == settled {
                false
            } else {
                *current = settled;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tokio::time::{sleep, timeout, Instant};

    const DELAY: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_settles_once() {
        let (tx, rx) = watch::channel(String::new());
        let mut search = Debounced::new(rx, DELAY);

        tx.send_replace("I".to_string());
        sleep(Duration::from_millis(150)).await;
        tx.send_replace("In".to_string());
        sleep(Duration::from_millis(150)).await;
        tx.send_replace("Inc".to_string());
        let last_change = Instant::now();

        assert_eq!(search.changed().await.as_deref(), Some("Inc"));
        let waited = last_change.elapsed();
        assert!(waited >= DELAY, "settled after {:?}", waited);
        assert!(waited < DELAY + Duration::from_millis(10));

        // Nothing else follows
        assert!(timeout(Duration::from_secs(5), search.changed())
            .await
            .is_err());
        assert_eq!(search.get(), "Inc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_is_passed_through() {
        let (_tx, rx) = watch::channel("start".to_string());
        let search = Debounced::new(rx, DELAY);
        assert_eq!(search.get(), "start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_value() {
        let (tx, rx) = watch::channel(String::new());
        let search = Debounced::new(rx, DELAY);
        let output = search.receiver();

        tx.send_replace("Inc".to_string());
        sleep(Duration::from_millis(100)).await;
        drop(search);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(*output.borrow(), "");
        assert!(output.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_discards_pending_value() {
        let (tx, rx) = watch::channel(0_u32);
        let mut numbers = Debounced::new(rx, DELAY);

        tx.send_replace(1);
        drop(tx);

        assert_eq!(numbers.changed().await, None);
        assert_eq!(numbers.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_revert_within_delay_emits_nothing() {
        let (tx, rx) = watch::channel("Inc".to_string());
        let mut search = Debounced::new(rx, DELAY);

        tx.send_replace("In".to_string());
        sleep(Duration::from_millis(100)).await;
        tx.send_replace("Inc".to_string());

        assert!(timeout(Duration::from_secs(2), search.changed())
            .await
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_fast_changes_emit_only_the_last(gaps in prop::collection::vec(0u64..490, 1..12)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            let (emitted, waited) = runtime.block_on(async {
                let (tx, rx) = watch::channel(0_usize);
                let mut debounced = Debounced::new(rx, DELAY);

                for (i, gap) in gaps.iter().enumerate() {
                    tx.send_replace(i + 1);
                    sleep(Duration::from_millis(*gap)).await;
                }
                tx.send_replace(gaps.len() + 1);
                let last_change = Instant::now();

                let mut emitted = Vec::new();
                let mut waited = None;
                while let Ok(Some(value)) = timeout(Duration::from_secs(3), debounced.changed()).await {
                    waited.get_or_insert_with(|| last_change.elapsed());
                    emitted.push(value);
                }
                (emitted, waited)
            });

            prop_assert_eq!(emitted, vec![gaps.len() + 1]);
            let waited = waited.unwrap();
            prop_assert!(waited >= DELAY);
            prop_assert!(waited < DELAY + Duration::from_millis(10));
        }
    }
}
