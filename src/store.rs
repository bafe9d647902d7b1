use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use teloxide::types::UserId;

use crate::state::SessionState;

/// Keyed storage of per-user sessions.
///
/// Implementations must serialize access to a single user's session while
/// letting different users proceed independently.
pub trait SessionStore: Send + Sync + 'static {
    /// Runs `f` with exclusive access to `user`'s session, creating it on
    /// first use.
    fn with_session<R>(&self, user: UserId, f: impl FnOnce(&mut SessionState) -> R) -> R;
}

/// Process-local sessions; everything is lost on restart.
#[derive(Debug, Default)]
pub struct InMemSessionStore {
    sessions: Mutex<HashMap<UserId, Arc<Mutex<SessionState>>>>,
}

impl InMemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, user: UserId) -> Arc<Mutex<SessionState>> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.entry(user).or_default().clone()
    }
}

impl SessionStore for InMemSessionStore {
    fn with_session<R>(&self, user: UserId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let cell = self.cell(user);
        let mut session = cell.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *session)
    }
}
