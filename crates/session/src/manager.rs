//! Owner of all live sessions.

use crate::session::{Session, short_id};
use concierge_core::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub active_sessions: usize,
    pub default_timeout: u32,
}

/// In-memory session store. Expired sessions are removed lazily on lookup or
/// by `cleanup_expired`.
pub struct SessionManager {
    sessions: HashMap<String, Session>,
    default_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(default_timeout_minutes: u32) -> Self {
        Self {
            sessions: HashMap::new(),
            default_timeout_minutes,
        }
    }

    pub fn default_timeout(&self) -> u32 {
        self.default_timeout_minutes
    }

    /// Create a session, replacing any existing one with the same id.
    pub fn create_session(&mut self, session_id: Option<&str>) -> &mut Session {
        let session = Session::new(session_id.map(str::to_owned), self.default_timeout_minutes);
        info!(session = %session.short_id(), "Created session");

        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(mut e) => {
                e.insert(session);
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(session),
        }
    }

    /// Look up a live session. An expired one is deleted and `None` returned.
    pub fn get_session(&mut self, session_id: &str) -> Option<&mut Session> {
        if self.sessions.get(session_id)?.is_expired() {
            info!(session = %short_id(session_id), "Session expired");
            self.delete_session(session_id);
            return None;
        }
        self.sessions.get_mut(session_id)
    }

    /// Like `get_session`, but says why the session is unavailable.
    pub fn require_session(&mut self, session_id: &str) -> Result<&mut Session, SessionError> {
        let expired = self
            .sessions
            .get(session_id)
            .map(Session::is_expired)
            .ok_or_else(|| SessionError::NotFound(session_id.to_owned()))?;
        if expired {
            self.delete_session(session_id);
            return Err(SessionError::Expired(session_id.to_owned()));
        }
        self.sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_owned()))
    }

    /// Return the live session with this id, or create one (reusing the id
    /// when given).
    pub fn get_or_create_session(&mut self, session_id: Option<&str>) -> &mut Session {
        let live = session_id.is_some_and(|id| self.get_session(id).is_some());
        match session_id {
            Some(id) if live => {
                let timeout = self.default_timeout_minutes;
                self.sessions
                    .entry(id.to_owned())
                    .or_insert_with(|| Session::new(Some(id.to_owned()), timeout))
            }
            _ => self.create_session(session_id),
        }
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete_session(&mut self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            info!(session = %short_id(session_id), "Deleted session");
        }
        removed
    }

    /// Remove every expired session, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        let removed = before - self.sessions.len();
        if removed > 0 {
            info!(removed, "Cleaned up expired sessions");
        }
        removed
    }

    /// Ids of sessions that have not expired.
    pub fn active_sessions(&self) -> Vec<&str> {
        self.sessions
            .values()
            .filter(|s| !s.is_expired())
            .map(|s| s.id.as_str())
            .collect()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_sessions: self.sessions.len(),
            active_sessions: self.active_sessions().len(),
            default_timeout: self.default_timeout_minutes,
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(30)
    }
}
