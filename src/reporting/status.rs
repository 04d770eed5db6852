use std::collections::VecDeque;

use dashmap::DashMap;
use serde::Serialize;
use tracing::info;

use crate::models::{SessionId, Verdict};

const PENDING_TEXT: &str = "…";
const PENDING_COLOR: &str = "#707070";

/// Statuses kept per session by [`MemoryPublisher`].
pub const HISTORY_LIMIT: usize = 32;

/// Per-session indicator: a short label and a background color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Status {
    pub fn verdict(verdict: &Verdict) -> Self {
        Self {
            text: verdict.grade.clone(),
            color: Some(verdict.tier.color().to_string()),
        }
    }

    /// Shown while a scan is waiting for its next poll.
    pub fn pending() -> Self {
        Self {
            text: PENDING_TEXT.to_string(),
            color: Some(PENDING_COLOR.to_string()),
        }
    }

    pub fn cleared() -> Self {
        Self { text: String::new(), color: None }
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.text == PENDING_TEXT
    }
}

/// Where session statuses end up (a browser badge, a log, an API).
pub trait StatusPublisher: Send + Sync {
    fn publish(&self, session: SessionId, status: Status);

    /// The session ended; drop anything kept for it.
    fn forget(&self, _session: SessionId) {}
}

/// Writes every status change to the log.
#[derive(Debug, Default)]
pub struct LogPublisher;

impl StatusPublisher for LogPublisher {
    fn publish(&self, session: SessionId, status: Status) {
        if status.is_cleared() {
            info!(session, "Status cleared");
        } else {
            info!(
                session,
                text = %status.text,
                color = status.color.as_deref().unwrap_or(""),
                "Status"
            );
        }
    }
}

/// Keeps the latest status per session plus its most recent
/// [`HISTORY_LIMIT`] statuses.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    history: DashMap<SessionId, VecDeque<Status>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, session: SessionId) -> Option<Status> {
        self.history.get(&session).and_then(|h| h.back().cloned())
    }

    /// Recent statuses of `session`, oldest first.
    pub fn history(&self, session: SessionId) -> Vec<Status> {
        self.history
            .get(&session)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl StatusPublisher for MemoryPublisher {
    fn publish(&self, session: SessionId, status: Status) {
        let mut history = self.history.entry(session).or_default();
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(status);
    }

    fn forget(&self, session: SessionId) {
        self.history.remove(&session);
    }
}
