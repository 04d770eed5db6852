use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::models::{ScanResult, ScanStatus};

/// Called once with the target when its entry expires.
pub type ExpiryCallback = Box<dyn FnOnce(&str) + Send + 'static>;

struct CacheEntry {
    result: ScanResult,
    cached_at: DateTime<Utc>,
    deadline: Instant,
    generation: u64,
    expiry: CancellationToken,
}

/// Point-in-time view of one entry.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub target: String,
    pub status: ScanStatus,
    pub cached_at: DateTime<Utc>,
    pub expires_in_secs: u64,
}

/// Last successful scan result per target, each with its own ttl.
///
/// Every entry owns an expiry task. Replacing or removing an entry cancels
/// that task, so an entry's expiry callback runs at most once and never for
/// an entry that was overwritten.
#[derive(Clone, Default)]
pub struct ResultCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    next_generation: Arc<AtomicU64>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `result` for `target`, replacing any previous entry.
    pub fn put(
        &self,
        target: &str,
        result: ScanResult,
        ttl: Duration,
        on_expire: Option<ExpiryCallback>,
    ) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let deadline = Instant::now() + ttl;
        let expiry = CancellationToken::new();

        let entry = CacheEntry {
            result,
            cached_at: Utc::now(),
            deadline,
            generation,
            expiry: expiry.clone(),
        };
        if let Some(previous) = self.entries.insert(target.to_string(), entry) {
            previous.expiry.cancel();
        }
        debug!(target = %target, ttl_secs = ttl.as_secs(), "Cached scan result");

        let entries = Arc::clone(&self.entries);
        let target = target.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = expiry.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    let expired = entries
                        .remove_if(&target, |_, e| e.generation == generation)
                        .is_some();
                    if expired {
                        debug!(target = %target, "Cache entry expired");
                        if let Some(callback) = on_expire {
                            callback(&target);
                        }
                    }
                }
            }
        });
    }

    /// Live result for `target`, if any.
    pub fn get(&self, target: &str) -> Option<ScanResult> {
        let entry = self.entries.get(target)?;
        // The expiry task may not have run yet
        if Instant::now() >= entry.deadline {
            return None;
        }
        Some(entry.result.clone())
    }

    /// Drop the entry without firing its expiry callback.
    pub fn remove(&self, target: &str) -> bool {
        match self.entries.remove(target) {
            Some((_, entry)) => {
                entry.expiry.cancel();
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.entries.retain(|_, entry| {
            entry.expiry.cancel();
            false
        });
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| now < e.deadline).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries, sorted by target.
    pub fn snapshot(&self) -> Vec<CacheSnapshot> {
        let now = Instant::now();
        let mut entries: Vec<CacheSnapshot> = self.entries
            .iter()
            .filter(|e| now < e.deadline)
            .map(|e| CacheSnapshot {
                target: e.key().clone(),
                status: e.result.status.clone(),
                cached_at: e.cached_at,
                expires_in_secs: e.deadline.saturating_duration_since(now).as_secs(),
            })
            .collect();
        entries.sort_by(|a, b| a.target.cmp(&b.target));
        entries
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
