//! Session table and expiry timer management.
//!
//! Each interactive rendered message owns at most one live session. The
//! registry is the single table mapping message IDs to session state plus the
//! expiry timer guarding the inactivity window. Teardown is idempotent:
//! removing an unknown message is a no-op, and an expiry firing while a
//! transition is in flight simply waits its turn on the session mutex.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

struct SessionEntry<S> {
    invoker_id: u64,
    state: Arc<Mutex<S>>,
    expiry: JoinHandle<()>,
}

/// Registry of live interactive sessions, keyed by rendered-message ID.
pub struct SessionRegistry<S> {
    entries: Mutex<HashMap<u64, SessionEntry<S>>>,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a session for a message, superseding any previous session on
    /// the same message and aborting its timer.
    pub async fn insert(
        &self,
        message_id: u64,
        invoker_id: u64,
        state: S,
        expiry: JoinHandle<()>,
    ) -> Arc<Mutex<S>> {
        let state = Arc::new(Mutex::new(state));
        let entry = SessionEntry {
            invoker_id,
            state: Arc::clone(&state),
            expiry,
        };

        let mut entries = self.entries.lock().await;
        if let Some(previous) = entries.insert(message_id, entry) {
            previous.expiry.abort();
        }

        state
    }

    /// Fetch the session state for a message, if one is live.
    pub async fn get(&self, message_id: u64) -> Option<Arc<Mutex<S>>> {
        self.entries
            .lock()
            .await
            .get(&message_id)
            .map(|entry| Arc::clone(&entry.state))
    }

    /// Remove a session and abort its timer. Idempotent.
    pub async fn remove(&self, message_id: u64) -> Option<Arc<Mutex<S>>> {
        self.entries.lock().await.remove(&message_id).map(|entry| {
            entry.expiry.abort();
            entry.state
        })
    }

    /// Remove a session without aborting its timer.
    ///
    /// This is the expiry task's own removal path: aborting the handle there
    /// would cancel the task mid-teardown at its next await point.
    pub async fn expire(&self, message_id: u64) -> Option<Arc<Mutex<S>>> {
        self.entries
            .lock()
            .await
            .remove(&message_id)
            .map(|entry| entry.state)
    }

    /// Replace the expiry timer for a message, aborting the previous one.
    ///
    /// Rearms the inactivity window after an authorized transition. If the
    /// session was torn down while the transition was in flight, the fresh
    /// timer has nothing to guard and is aborted instead.
    pub async fn rearm(&self, message_id: u64, expiry: JoinHandle<()>) {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(&message_id) {
            Some(entry) => {
                let stale = std::mem::replace(&mut entry.expiry, expiry);
                stale.abort();
            }
            None => expiry.abort(),
        }
    }

    /// Take every live session owned by an invoker, aborting their timers.
    ///
    /// Callers disable the surrendered messages' controls; this is what keeps
    /// one interactive session per invoker.
    pub async fn take_by_invoker(&self, invoker_id: u64) -> Vec<(u64, Arc<Mutex<S>>)> {
        let mut entries = self.entries.lock().await;
        let message_ids: Vec<u64> = entries
            .iter()
            .filter(|(_, entry)| entry.invoker_id == invoker_id)
            .map(|(message_id, _)| *message_id)
            .collect();

        let mut taken = Vec::with_capacity(message_ids.len());
        for message_id in message_ids {
            if let Some(entry) = entries.remove(&message_id) {
                entry.expiry.abort();
                taken.push((message_id, entry.state));
            }
        }

        taken
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    fn idle_timer() -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn insert_get_remove_roundtrip() {
        let registry = SessionRegistry::new();
        registry.insert(1, 10, "session", idle_timer()).await;

        let state = registry.get(1).await.expect("session should be live");
        assert_eq!(*state.lock().await, "session");

        assert!(registry.remove(1).await.is_some());
        assert!(registry.get(1).await.is_none());
    }

    #[tokio::test]
    async fn removal_is_idempotent() {
        let registry: SessionRegistry<&str> = SessionRegistry::new();
        assert!(registry.remove(99).await.is_none());

        registry.insert(99, 10, "session", idle_timer()).await;
        assert!(registry.remove(99).await.is_some());
        assert!(registry.remove(99).await.is_none());
    }

    #[tokio::test]
    async fn inserting_over_a_message_supersedes_the_previous_session() {
        let registry = SessionRegistry::new();
        registry.insert(1, 10, "first", idle_timer()).await;
        registry.insert(1, 11, "second", idle_timer()).await;

        let state = registry.get(1).await.expect("session should be live");
        assert_eq!(*state.lock().await, "second");
    }

    #[tokio::test]
    async fn take_by_invoker_only_takes_that_invokers_sessions() {
        let registry = SessionRegistry::new();
        registry.insert(1, 10, "a", idle_timer()).await;
        registry.insert(2, 10, "b", idle_timer()).await;
        registry.insert(3, 20, "c", idle_timer()).await;

        let mut taken = registry.take_by_invoker(10).await;
        taken.sort_by_key(|(message_id, _)| *message_id);
        let message_ids: Vec<u64> = taken.iter().map(|(message_id, _)| *message_id).collect();
        assert_eq!(message_ids, vec![1, 2]);

        assert!(registry.get(1).await.is_none());
        assert!(registry.get(2).await.is_none());
        assert!(registry.get(3).await.is_some());
    }

    #[tokio::test]
    async fn expiry_task_can_remove_its_own_entry_and_finish_teardown() {
        static TORN_DOWN: AtomicBool = AtomicBool::new(false);

        let registry: Arc<SessionRegistry<&str>> = Arc::new(SessionRegistry::new());
        let task_registry = Arc::clone(&registry);
        let expiry = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let removed = task_registry.expire(7).await;
            // Work past the removal still runs because expire() does not
            // abort the running task's own handle.
            tokio::time::sleep(Duration::from_millis(1)).await;
            TORN_DOWN.store(removed.is_some(), Ordering::SeqCst);
        });

        registry.insert(7, 10, "session", expiry).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(registry.get(7).await.is_none());
        assert!(TORN_DOWN.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn rearm_on_a_torn_down_session_aborts_the_fresh_timer() {
        let registry: SessionRegistry<&str> = SessionRegistry::new();
        let timer = idle_timer();
        registry.rearm(1, timer).await;

        // Nothing to assert beyond not hanging: the timer was aborted rather
        // than left sleeping for an hour against a dead key.
        assert!(registry.get(1).await.is_none());
    }
}
