use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-user conversation state for one bot.
///
/// Each bot gets its own store, so a user can be halfway through a form in
/// the customer bot and registering in the pro bot at the same time.
pub struct DialogueStore<S> {
    states: Arc<Mutex<HashMap<i64, S>>>,
}

impl<S> Clone for DialogueStore<S> {
    fn clone(&self) -> Self {
        Self {
            states: Arc::clone(&self.states),
        }
    }
}

impl<S> Default for DialogueStore<S> {
    fn default() -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<S: Clone> DialogueStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> Option<S> {
        self.states.lock().await.get(&user_id).cloned()
    }

    pub async fn set(&self, user_id: i64, state: S) {
        self.states.lock().await.insert(user_id, state);
    }

    /// Drops the user's state, returning what it was
    pub async fn clear(&self, user_id: i64) -> Option<S> {
        self.states.lock().await.remove(&user_id)
    }

    /// Removes and returns the user's state if `pred` accepts it.
    ///
    /// Check and removal happen under one lock, so of two concurrent
    /// callers at most one gets the state.
    pub async fn take_if(&self, user_id: i64, pred: impl FnOnce(&S) -> bool) -> Option<S> {
        let mut states = self.states.lock().await;
        if states.get(&user_id).is_some_and(pred) {
            states.remove(&user_id)
        } else {
            None
        }
    }
}
