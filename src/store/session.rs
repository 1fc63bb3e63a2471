use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::auth::token;
use crate::contacts::ContactList;

/// Everything the server remembers about one client.
#[derive(Debug, Default)]
pub struct SessionData {
    pub username: Option<String>,
    pub contact_list: ContactList,
    /// Flash message shown on the next rendered page.
    pub message: Option<String>,
}

impl SessionData {
    pub fn flash(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }
}

/// Shared handle to a session. Holding the lock makes the holder the only
/// writer of that session's contact list.
pub type SessionHandle = Arc<Mutex<SessionData>>;

const DEFAULT_ANONYMOUS_TTL_SECS: i64 = 15 * 60;

struct Entry {
    data: SessionHandle,
    expires_at: DateTime<Utc>,
    ttl: Duration,
}

/// In-memory session store keyed by the SHA-256 of the cookie token.
///
/// Expiry is sliding: every successful lookup pushes it out by the entry's
/// TTL. New sessions start on the short anonymous TTL and move to the full
/// TTL once [`promote`](Self::promote)d after a sign-in.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<DashMap<String, Entry>>,
    ttl: Duration,
    anonymous_ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        let ttl = Duration::try_seconds(ttl_secs).unwrap_or_else(|| Duration::days(1));
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            anonymous_ttl: Duration::seconds(DEFAULT_ANONYMOUS_TTL_SECS).min(ttl),
        }
    }

    /// Set the lifetime of sessions that have never signed in. Capped at the
    /// full TTL.
    #[must_use]
    pub fn with_anonymous_ttl(mut self, secs: i64) -> Self {
        if let Some(ttl) = Duration::try_seconds(secs) {
            self.anonymous_ttl = ttl.min(self.ttl);
        }
        self
    }

    /// Start a fresh anonymous session. Returns the raw cookie token.
    pub fn create(&self) -> (String, SessionHandle) {
        let (raw_token, key) = token::generate_session_token();
        let data: SessionHandle = Arc::new(Mutex::new(SessionData::default()));
        self.entries.insert(
            key,
            Entry {
                data: Arc::clone(&data),
                expires_at: Utc::now() + self.anonymous_ttl,
                ttl: self.anonymous_ttl,
            },
        );
        tracing::debug!(sessions = self.entries.len(), "session created");
        (raw_token, data)
    }

    /// Look up a live session by its raw cookie token. An expired session is
    /// dropped and reported as missing.
    pub fn get(&self, raw_token: &str) -> Option<SessionHandle> {
        let key = token::hash_token(raw_token);
        let now = Utc::now();
        {
            let mut entry = self.entries.get_mut(&key)?;
            if entry.expires_at > now {
                entry.expires_at = now + entry.ttl;
                return Some(Arc::clone(&entry.data));
            }
        }
        self.entries.remove(&key);
        tracing::debug!("expired session dropped");
        None
    }

    /// Move a session onto the full TTL. Returns false if it is gone.
    pub fn promote(&self, raw_token: &str) -> bool {
        let Some(mut entry) = self.entries.get_mut(&token::hash_token(raw_token)) else {
            return false;
        };
        if entry.ttl < self.ttl {
            entry.ttl = self.ttl;
            entry.expires_at = Utc::now() + self.ttl;
            tracing::debug!("session promoted to full ttl");
        }
        true
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
