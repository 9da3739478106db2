//! Live chat sessions of the web front end, keyed by browser session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::generator::TextGenerator;
use crate::observability::{WEB_SESSIONS_CLOSED, WEB_SESSIONS_EVICTED, WEB_SESSIONS_OPENED};

/// Identifier handed to the browser when its session starts.
pub type SessionId = Uuid;

/// A session shared between requests.  The mutex serializes turns.
pub type SharedSession<G> = Arc<Mutex<ChatSession<G>>>;

struct Entry<G: TextGenerator> {
    session: SharedSession<G>,
    last_used: Instant,
}

/// Creates a session per browser tab and destroys it when the tab leaves
/// or goes quiet.
pub struct SessionRegistry<G: TextGenerator + Clone> {
    generator: G,
    sessions: RwLock<HashMap<SessionId, Entry<G>>>,
}

impl<G: TextGenerator + Clone> SessionRegistry<G> {
    /// Sessions created by this registry all talk to clones of `generator`.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new, empty session.
    pub async fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        let entry = Entry {
            session: Arc::new(Mutex::new(ChatSession::new(self.generator.clone()))),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        WEB_SESSIONS_OPENED.click();
        tracing::info!(session = %id, "session started");
        id
    }

    /// Look up a live session and mark it used.
    pub async fn get(&self, id: &SessionId) -> Option<SharedSession<G>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// End a session.  Returns false if it did not exist.
    ///
    /// A turn already running keeps its handle and completes; the session is
    /// dropped afterwards.
    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            WEB_SESSIONS_CLOSED.click();
            tracing::info!(session = %id, "session ended");
        }
        removed
    }

    /// Drop every session unused for at least `idle`.  Returns how many went.
    ///
    /// A session in the middle of a turn is kept regardless.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let busy = entry.session.try_lock().is_err();
            let keep = busy || now.duration_since(entry.last_used) < idle;
            if !keep {
                tracing::info!(session = %id, "session expired");
            }
            keep
        });
        let evicted = before - sessions.len();
        WEB_SESSIONS_EVICTED.count(evicted as u64);
        evicted
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no session is live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
