//! Server-side sessions: opaque token -> authenticated user id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionManager {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Establish a session for `user_id`. The browser's previous token, if any,
    /// is revoked so each login starts from a fresh token.
    pub async fn login(&self, user_id: i64, previous: Option<&str>) -> String {
        let now = Utc::now();
        let token = Uuid::new_v4().simple().to_string();

        let mut sessions = self.sessions.write().await;
        if let Some(prev) = previous {
            sessions.remove(prev);
        }
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        debug!(active = sessions.len(), "session established");
        token
    }

    pub async fn current_user(&self, token: &str) -> Option<i64> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if s.expires_at > Utc::now() => return Some(s.user_id),
                Some(_) => {}
                None => return None,
            }
        }
        // expired
        self.sessions.write().await.remove(token);
        None
    }

    /// Idempotent.
    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}
