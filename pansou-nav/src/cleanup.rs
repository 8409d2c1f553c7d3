//! Deferred deletion of rendered messages.
//!
//! One shared map of (chat, message) -> deadline and a single sweep
//! task started lazily on the first `arm` and stopped once the map
//! drains. Deletion precision is bounded by the sweep interval, which
//! is deliberate: the auto-delete delay is minutes, the interval is
//! seconds, and the trade buys O(1) arming with no per-message timer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, warn};

/// Outcome of a transport delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The message was already gone. Treated as success: the platform
    /// may remove messages out-of-band before the scheduler fires.
    NotFound,
}

/// Transport-side deletion of a single message.
#[async_trait]
pub trait MessageDeleter: Send + Sync {
    async fn delete_message(&self, chat_id: i64, message_id: i32)
    -> anyhow::Result<DeleteOutcome>;
}

struct QueueState {
    pending: HashMap<(i64, i32), Instant>,
    running: bool,
}

/// Scheduler for "delete this message at time T" obligations.
pub struct DeletionQueue {
    state: Mutex<QueueState>,
    sweep_interval: Duration,
    deleter: Arc<dyn MessageDeleter>,
}

impl DeletionQueue {
    pub fn new(deleter: Arc<dyn MessageDeleter>, sweep_interval: Duration) -> Arc<DeletionQueue> {
        Arc::new(DeletionQueue {
            state: Mutex::new(QueueState {
                pending: HashMap::new(),
                running: false,
            }),
            sweep_interval,
            deleter,
        })
    }

    /// Schedule a message for deletion after `ttl`.
    ///
    /// Arming an already-pending message overwrites its deadline; this
    /// is how editing a view resets its countdown.
    pub fn arm(self: &Arc<Self>, chat_id: i64, message_id: i32, ttl: Duration) {
        let mut state = self.lock();
        state
            .pending
            .insert((chat_id, message_id), Instant::now() + ttl);
        if !state.running {
            state.running = true;
            tokio::spawn(Arc::clone(self).sweep_loop());
        }
    }

    /// Number of armed deletions, for status reporting.
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    async fn sweep_loop(self: Arc<Self>) {
        loop {
            sleep(self.sweep_interval).await;

            let due: Vec<(i64, i32)> = {
                let mut state = self.lock();
                let now = Instant::now();
                let keys: Vec<(i64, i32)> = state
                    .pending
                    .iter()
                    .filter(|(_, deadline)| **deadline <= now)
                    .map(|(key, _)| *key)
                    .collect();
                for key in &keys {
                    state.pending.remove(key);
                }
                keys
            };

            for (chat_id, message_id) in due {
                match self.deleter.delete_message(chat_id, message_id).await {
                    Ok(_) => {}
                    Err(source) => {
                        warn!(chat_id, message_id, %source, "scheduled delete failed");
                    }
                }
            }

            let mut state = self.lock();
            if state.pending.is_empty() {
                state.running = false;
                debug!("deletion queue idle");
                return;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDeleter {
        calls: Mutex<Vec<(i64, i32)>>,
        not_found: bool,
        fail: bool,
    }

    impl RecordingDeleter {
        fn calls(&self) -> Vec<(i64, i32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageDeleter for RecordingDeleter {
        async fn delete_message(
            &self,
            chat_id: i64,
            message_id: i32,
        ) -> anyhow::Result<DeleteOutcome> {
            self.calls.lock().unwrap().push((chat_id, message_id));
            if self.fail {
                anyhow::bail!("transport unavailable");
            }
            if self.not_found {
                Ok(DeleteOutcome::NotFound)
            } else {
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    const SWEEP: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn entry_fires_after_deadline_not_before() {
        let deleter = Arc::new(RecordingDeleter::default());
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(7));

        // First sweep at t=5: deadline t=7 not yet due.
        sleep(Duration::from_secs(6)).await;
        assert!(deleter.calls().is_empty());
        assert_eq!(queue.pending_len(), 1);

        // Second sweep at t=10 fires it.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(deleter.calls(), vec![(1, 100)]);
        assert_eq!(queue.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_overwrites_the_deadline() {
        let deleter = Arc::new(RecordingDeleter::default());
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(6));
        sleep(Duration::from_secs(4)).await;
        // Simulates an edit at t=4: countdown restarts.
        queue.arm(1, 100, Duration::from_secs(10));

        sleep(Duration::from_secs(7)).await; // t=11, sweep at t=10 saw deadline t=14
        assert!(deleter.calls().is_empty());

        sleep(Duration::from_secs(5)).await; // sweep at t=15
        assert_eq!(deleter.calls(), vec![(1, 100)]);
    }

    #[tokio::test(start_paused = true)]
    async fn queue_goes_idle_and_restarts_on_next_arm() {
        let deleter = Arc::new(RecordingDeleter::default());
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(1));
        sleep(Duration::from_secs(6)).await;
        assert_eq!(deleter.calls().len(), 1);
        assert!(!queue.lock().running);

        queue.arm(2, 200, Duration::from_secs(1));
        assert!(queue.lock().running);
        sleep(Duration::from_secs(6)).await;
        assert_eq!(deleter.calls(), vec![(1, 100), (2, 200)]);
        assert!(!queue.lock().running);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_counts_as_success() {
        let deleter = Arc::new(RecordingDeleter {
            not_found: true,
            ..RecordingDeleter::default()
        });
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(1));
        sleep(Duration::from_secs(6)).await;
        assert_eq!(deleter.calls().len(), 1);
        assert_eq!(queue.pending_len(), 0);
        assert!(!queue.lock().running);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_is_swallowed_and_entry_removed() {
        let deleter = Arc::new(RecordingDeleter {
            fail: true,
            ..RecordingDeleter::default()
        });
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(1));
        queue.arm(1, 101, Duration::from_secs(1));
        sleep(Duration::from_secs(6)).await;
        assert_eq!(deleter.calls().len(), 2);
        assert_eq!(queue.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_messages_fire_independently() {
        let deleter = Arc::new(RecordingDeleter::default());
        let queue = DeletionQueue::new(deleter.clone(), SWEEP);

        queue.arm(1, 100, Duration::from_secs(1));
        queue.arm(1, 200, Duration::from_secs(12));

        sleep(Duration::from_secs(6)).await;
        assert_eq!(deleter.calls(), vec![(1, 100)]);
        assert_eq!(queue.pending_len(), 1);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(deleter.calls(), vec![(1, 100), (1, 200)]);
        assert_eq!(queue.pending_len(), 0);
    }
}
