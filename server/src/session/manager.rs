use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Longest session lifetime the store accepts (one year).
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionData {
    pub token: Option<String>,
    pub expires_at: Instant,
}

impl SessionData {
    pub fn new(expiry_hours: u64) -> Self {
        let now = Instant::now();
        let ttl = expiry_hours.min(MAX_EXPIRY_HOURS).saturating_mul(3600);
        let expires_at = now
            .checked_add(Duration::from_secs(ttl))
            .unwrap_or(now);

        Self {
            token: None,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory session store. A session only gets an entry once something
/// is written to it.
#[derive(Clone)]
pub struct SessionStore {
    // session_id -> SessionData
    sessions: Arc<DashMap<String, SessionData>>,
    expiry_hours: u64,
}

impl SessionStore {
    pub fn new(expiry_hours: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            expiry_hours: expiry_hours.min(MAX_EXPIRY_HOURS),
        }
    }

    pub fn expiry_hours(&self) -> u64 {
        self.expiry_hours
    }

    /// Resumes the session named by `session_id` when it is still live,
    /// otherwise starts a new one under a fresh id.
    pub fn open(&self, session_id: Option<&str>) -> Session {
        if let Some(id) = session_id {
            if self.is_live(id) {
                return Session {
                    id: id.to_string(),
                    store: self.clone(),
                    is_new: false,
                };
            }
            log::debug!("Session {} is unknown or expired, starting a new one", id);
        }

        Session {
            id: Uuid::new_v4().to_string(),
            store: self.clone(),
            is_new: true,
        }
    }

    fn is_live(&self, session_id: &str) -> bool {
        let expired = match self.sessions.get(session_id) {
            Some(session) => session.is_expired(),
            None => return false,
        };

        if expired {
            self.invalidate_session(session_id);
        }
        !expired
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn token(&self, session_id: &str) -> Option<String> {
        let session = self.sessions.get(session_id)?;
        if session.is_expired() {
            drop(session);
            self.invalidate_session(session_id);
            return None;
        }
        session.token.clone()
    }

    pub fn set_token(&self, session_id: &str, token: String) {
        let expiry_hours = self.expiry_hours;
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionData::new(expiry_hours))
            .token = Some(token);
    }

    pub fn clear_token(&self, session_id: &str) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.token = None;
        }
    }

    pub fn invalidate_session(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            log::info!("Invalidated session: {}", session_id);
        }
    }

    pub fn cleanup_expired(&self) -> usize {
        let mut removed = 0;

        self.sessions.retain(|session_id, session| {
            if session.is_expired() {
                log::debug!("Cleaned up expired session: {}", session_id);
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            log::info!("Cleaned up {} expired sessions", removed);
        }

        removed
    }

    pub fn active_session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Per-request handle onto one session's token.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
    is_new: bool,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when no valid cookie named this session on the way in.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn token(&self) -> Option<String> {
        self.store.token(&self.id)
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.store.set_token(&self.id, token.into());
    }

    pub fn clear_token(&mut self) {
        self.store.clear_token(&self.id);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("is_new", &self.is_new)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_cookie_starts_new_session() {
        let store = SessionStore::new(24);
        let session = store.open(None);

        assert!(session.is_new());
        assert!(session.token().is_none());
        // Nothing written yet, so nothing stored
        assert_eq!(store.active_session_count(), 0);
    }

    #[test]
    fn test_set_token_persists_session() {
        let store = SessionStore::new(24);
        let mut session = store.open(None);
        session.set_token("abc");

        assert_eq!(store.active_session_count(), 1);
        assert_eq!(store.token(session.id()).as_deref(), Some("abc"));

        let resumed = store.open(Some(session.id()));
        assert!(!resumed.is_new());
        assert_eq!(resumed.id(), session.id());
        assert_eq!(resumed.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_clear_token_keeps_session() {
        let store = SessionStore::new(24);
        let mut session = store.open(None);
        session.set_token("abc");
        session.clear_token();

        assert!(session.token().is_none());
        assert!(store.contains(session.id()));
    }

    #[test]
    fn test_unknown_id_starts_new_session() {
        let store = SessionStore::new(24);
        let session = store.open(Some("not-a-session"));

        assert!(session.is_new());
        assert_ne!(session.id(), "not-a-session");
    }

    #[test]
    fn test_invalidate_session() {
        let store = SessionStore::new(24);
        let mut session = store.open(None);
        session.set_token("abc");

        store.invalidate_session(session.id());
        assert_eq!(store.active_session_count(), 0);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_session_expiry() {
        let store = SessionStore::new(0); // Expire immediately
        let mut session = store.open(None);
        session.set_token("abc");

        std::thread::sleep(Duration::from_millis(10));

        assert!(session.token().is_none());
        assert!(store.open(Some(session.id())).is_new());
    }

    #[test]
    fn test_huge_expiry_is_capped() {
        let store = SessionStore::new(9_999_999_999_999_999);
        let mut session = store.open(None);
        session.set_token("abc");

        assert_eq!(store.expiry_hours(), MAX_EXPIRY_HOURS);
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new(0);
        for _ in 0..3 {
            store.open(None).set_token("abc");
        }

        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(store.cleanup_expired(), 3);
        assert_eq!(store.active_session_count(), 0);
    }
}
