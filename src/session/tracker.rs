use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use crate::models::SessionId;
use super::hostname::is_qualified;

/// Distinct hostnames seen per session, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    sessions: Arc<RwLock<HashMap<SessionId, Vec<String>>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `hostname` to the session, creating the session on first visit.
    /// Returns `true` if the hostname was not tracked before.
    pub async fn record_visit(&self, session: SessionId, hostname: &str) -> bool {
        if !is_qualified(hostname) {
            return false;
        }

        let mut sessions = self.sessions.write().await;
        let hostnames = sessions.entry(session).or_default();
        if hostnames.iter().any(|h| h == hostname) {
            return false;
        }
        hostnames.push(hostname.to_string());
        debug!(session, hostname, tracked = hostnames.len(), "Tracking hostname");
        true
    }

    /// Forget the session's hostnames but keep the session itself.
    pub async fn reset(&self, session: SessionId) {
        if let Some(hostnames) = self.sessions.write().await.get_mut(&session) {
            hostnames.clear();
        }
    }

    pub async fn reset_all(&self) {
        let mut sessions = self.sessions.write().await;
        for hostnames in sessions.values_mut() {
            hostnames.clear();
        }
        debug!(sessions = sessions.len(), "Cleared tracked hostnames");
    }

    /// Drop the session entirely, once it has ended.
    pub async fn remove(&self, session: SessionId) -> bool {
        self.sessions.write().await.remove(&session).is_some()
    }

    pub async fn hostnames(&self, session: SessionId) -> Option<Vec<String>> {
        self.sessions.read().await.get(&session).cloned()
    }

    /// Session hostnames with `primary` moved to the front.
    pub async fn ordered_hostnames(&self, session: SessionId, primary: &str) -> Vec<String> {
        let hostnames = self.hostnames(session).await.unwrap_or_default();
        primary_first(hostnames, primary)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Move `primary` to the front of `hostnames`, keeping the rest in order.
pub fn primary_first(mut hostnames: Vec<String>, primary: &str) -> Vec<String> {
    if hostnames.len() > 1 {
        if let Some(pos) = hostnames.iter().position(|h| h == primary) {
            let host = hostnames.remove(pos);
            hostnames.insert(0, host);
        }
    }
    hostnames
}
