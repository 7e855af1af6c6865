use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::quiz::session::QuizSession;

pub type SharedSession = Arc<Mutex<QuizSession>>;

/// All live quiz sessions, keyed by the opaque id handed out on start.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(QuizSession::new()));
        self.sessions.write().await.insert(id, Arc::clone(&session));
        debug!(session_id = %id, "Created quiz session");
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.lock().await.touch();
        Some(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for at least `max_idle`. Sessions busy generating are kept.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => guard.idle_for() < max_idle,
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Pruned {removed} idle quiz sessions");
        }
        removed
    }
}
