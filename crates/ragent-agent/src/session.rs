//! Per-session conversation memory

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One completed query/response exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            created_at: Utc::now(),
        }
    }
}

/// A conversation identified by a caller-supplied id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub turns: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            turns: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Process-local session store
///
/// Sessions are created on first use and live for the process lifetime.
/// There is no cross-process synchronization.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last `n` turns of a session, oldest first; empty for unknown sessions
    pub async fn recent_turns(&self, session_id: &str, n: usize) -> Vec<ChatTurn> {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(session) => {
                let skip = session.turns.len().saturating_sub(n);
                session.turns[skip..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Append a completed turn, creating the session if needed
    pub async fn record_turn(&self, session_id: &str, query: &str, response: &str) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        session.turns.push(ChatTurn::new(query, response));
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
