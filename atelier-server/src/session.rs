//! In-memory storage for authoring sessions.
//!
//! An authoring session collects the image-scan outcomes of one draft before
//! publication. Sessions are short-lived (30 minute expiry) and don't need
//! database persistence; the accepted images and scan entries move into the
//! listing record at publish time.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use atelier_core::ScanSession;

/// Maximum age for an authoring session (30 minutes)
const SESSION_EXPIRY_SECS: u64 = 1800;

/// Pending authoring session with expiration
pub struct SessionEntry {
    pub seller_id: Uuid,
    pub scan: ScanSession,
    pub expires_at: Instant,
}

/// In-memory storage for in-flight authoring sessions
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
}

impl SessionStore {
    /// Create a new session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds until a freshly opened session expires
    pub fn expiry_secs() -> u64 {
        SESSION_EXPIRY_SECS
    }

    /// Open a new session for a seller and return its id
    pub fn open(&self, seller_id: Uuid) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.insert(
            session_id,
            SessionEntry {
                seller_id,
                scan: ScanSession::new(),
                expires_at: Instant::now() + Duration::from_secs(SESSION_EXPIRY_SECS),
            },
        );
        session_id
    }

    /// Run `f` against the live session's scan state.
    ///
    /// Returns `None` when the session is unknown or expired. The dashmap
    /// guard is dropped before returning, so `f` must not block.
    pub fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut ScanSession) -> T,
    ) -> Option<T> {
        let mut entry = self.sessions.get_mut(&session_id)?;
        if entry.expires_at > Instant::now() {
            Some(f(&mut entry.scan))
        } else {
            None // Expired
        }
    }

    /// Owning seller of a live session
    pub fn seller_of(&self, session_id: Uuid) -> Option<Uuid> {
        let entry = self.sessions.get(&session_id)?;
        if entry.expires_at > Instant::now() {
            Some(entry.seller_id)
        } else {
            None
        }
    }

    /// Retrieve and remove a session's scan state
    pub fn take(&self, session_id: Uuid) -> Option<(Uuid, ScanSession)> {
        let (_, entry) = self.sessions.remove(&session_id)?;
        if entry.expires_at > Instant::now() {
            Some((entry.seller_id, entry.scan))
        } else {
            None // Expired
        }
    }

    /// Remove expired sessions (called periodically)
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.sessions.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::ImageVerdict;

    fn clean_verdict() -> ImageVerdict {
        ImageVerdict {
            safe: true,
            flagged: false,
            reason: String::new(),
        }
    }

    #[test]
    fn test_open_then_take_returns_scan_state() {
        let store = SessionStore::new();
        let seller = Uuid::new_v4();
        let id = store.open(seller);

        store
            .with_session(id, |scan| {
                scan.record_image_scan("images/a.webp", &clean_verdict());
            })
            .expect("session should be live");

        let (owner, scan) = store.take(id).expect("session should be live");
        assert_eq!(owner, seller);
        assert_eq!(scan.accepted_images(), ["images/a.webp"]);
        // take removes the session
        assert!(store.take(id).is_none());
    }

    #[test]
    fn test_unknown_session_yields_none() {
        let store = SessionStore::new();
        assert!(store.with_session(Uuid::new_v4(), |_| ()).is_none());
        assert!(store.seller_of(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_cleanup_retains_live_sessions() {
        let store = SessionStore::new();
        let id = store.open(Uuid::new_v4());
        store.cleanup_expired();
        assert_eq!(store.count(), 1);
        assert!(store.seller_of(id).is_some());
    }
}
