use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::Session;

/// Bounded, expiring map of live sessions.
///
/// A session expires once it has been idle for `ttl`; inserting into a full
/// store evicts the least recently used one. Callers get `&mut Session` only
/// inside [`SessionStore::with_session`], so the lock is never held across an
/// `.await`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<String, Session>>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: TimeDelta) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { sessions: Arc::new(Mutex::new(LruCache::new(capacity))), ttl }
    }

    pub fn insert(&self, session: Session) {
        self.insert_at(session, Utc::now());
    }

    /// Runs `f` on the live session `id`, refreshing both its idle timer and
    /// its recency. `None` when the session is unknown or has expired.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.with_session_at(id, Utc::now(), f)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub(crate) fn insert_at(&self, mut session: Session, now: DateTime<Utc>) {
        let mut sessions = self.sessions.lock();
        self.purge_expired(&mut sessions, now);

        session.touch(now);
        let id = session.id().to_string();
        if let Some((evicted, _)) = sessions.push(id.clone(), session) {
            if evicted != id {
                info!("Session store full, evicted {evicted}");
            }
        }
    }

    pub(crate) fn with_session_at<R>(
        &self,
        id: &str,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock();
        self.purge_expired(&mut sessions, now);
        let session = sessions.get_mut(id)?;
        session.touch(now);
        Some(f(session))
    }

    fn purge_expired(&self, sessions: &mut LruCache<String, Session>, now: DateTime<Utc>) {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, session)| now - session.last_seen >= self.ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            debug!("Session {id} expired");
            sessions.pop(&id);
        }
    }
}
