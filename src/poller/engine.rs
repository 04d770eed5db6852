use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::errors::GradewatchError;
use crate::models::{ScanResult, ScanStatus, SessionId};
use super::client::ScanService;
use super::state::{PollOutcome, PollPhase, PollPolicy, PollProgress, PollSnapshot, ScanOptions};

/// Receives the visible effects of a poll.
///
/// Callbacks only run while the poll is still the live one for its target,
/// and they run with the poll table locked for that target: they must not
/// call back into the [`ScanPoller`].
pub trait PollObserver: Send + Sync {
    fn on_pending(&self, _progress: &PollProgress) {}

    fn on_ready(&self, _target: &str, _result: &ScanResult) {}

    fn on_failed(&self, _target: &str, _error: &GradewatchError) {}
}

/// Observer that ignores everything.
impl PollObserver for () {}

struct PollEntry {
    generation: u64,
    cancel: CancellationToken,
    phase: PollPhase,
    attempt: u32,
    session: Option<SessionId>,
    started_at: DateTime<Utc>,
}

/// Drives scans to a terminal state, one live poll per target.
///
/// Starting a poll for a target that is already being polled cancels the
/// older poll's token. The older poll then stops at its next suspension
/// point and never caches, publishes or reports anything afterwards.
#[derive(Clone)]
pub struct ScanPoller {
    service: Arc<dyn ScanService>,
    cache: ResultCache,
    policy: PollPolicy,
    polls: Arc<DashMap<String, PollEntry>>,
    next_generation: Arc<AtomicU64>,
}

/// Removes the poll's table entry when the poll ends or is dropped.
struct PollGuard {
    polls: Arc<DashMap<String, PollEntry>>,
    target: String,
    generation: u64,
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.polls.remove_if(&self.target, |_, e| e.generation == self.generation);
    }
}

impl ScanPoller {
    pub fn new(service: Arc<dyn ScanService>, cache: ResultCache, policy: PollPolicy) -> Self {
        Self {
            service,
            cache,
            policy,
            polls: Arc::new(DashMap::new()),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll `target` until the scan is ready or fails.
    ///
    /// `Ok(PollOutcome::Ready)` results are already in the cache, with the
    /// ttl taken from `options`. Errors are terminal and never cached.
    pub async fn ensure_scanned(
        &self,
        target: &str,
        options: &ScanOptions,
        session: Option<SessionId>,
        observer: &dyn PollObserver,
    ) -> Result<PollOutcome, GradewatchError> {
        let (generation, cancel) = self.register(target, session);
        let _guard = PollGuard {
            polls: Arc::clone(&self.polls),
            target: target.to_string(),
            generation,
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            self.update(target, generation, PollPhase::Requested, attempt);
            debug!(target = %target, attempt, service = self.service.service_name(), "Polling scan service");

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(PollOutcome::Superseded),
                response = self.service.analyze(target, options) => response,
            };

            let result = match response {
                Ok(result) => result,
                Err(e) => return self.fail(target, generation, e, observer),
            };

            let delay = match self.policy.delay_for(&result.status) {
                Some(delay) => delay,
                None if result.status == ScanStatus::Ready => {
                    return Ok(self.complete(target, generation, result, options, observer));
                }
                None => {
                    let message = result.status_message
                        .unwrap_or_else(|| "assessment failed".to_string());
                    return self.fail(target, generation, GradewatchError::ScanService(message), observer);
                }
            };

            if !self.policy.allows_another(attempt) {
                let err = GradewatchError::PollLimit(format!(
                    "{} still {} after {} polls", target, result.status, attempt
                ));
                return self.fail(target, generation, err, observer);
            }

            let progress = PollProgress {
                target: target.to_string(),
                attempt,
                status: result.status.clone(),
                delay,
            };
            let live = self.with_live(target, generation, |entry| {
                entry.phase = PollPhase::AwaitingRetry { delay };
                observer.on_pending(&progress);
            });
            if live.is_none() {
                return Ok(PollOutcome::Superseded);
            }
            debug!(
                target = %target,
                status = %result.status,
                attempt,
                delay_secs = delay.as_secs(),
                "Scan pending, retrying later"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(PollOutcome::Superseded),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Cancel the live poll for `target`, if any.
    pub fn cancel(&self, target: &str) -> bool {
        match self.polls.remove(target) {
            Some((_, entry)) => {
                entry.cancel.cancel();
                info!(target = %target, "Poll cancelled");
                true
            }
            None => false,
        }
    }

    pub fn phase(&self, target: &str) -> Option<PollPhase> {
        self.polls.get(target).map(|e| e.phase)
    }

    pub fn is_polling(&self, target: &str) -> bool {
        self.polls.contains_key(target)
    }

    /// Live polls, sorted by target.
    pub fn in_flight(&self) -> Vec<PollSnapshot> {
        let mut polls: Vec<PollSnapshot> = self.polls
            .iter()
            .map(|e| PollSnapshot {
                target: e.key().clone(),
                phase: e.phase,
                attempt: e.attempt,
                session: e.session,
                started_at: e.started_at,
            })
            .collect();
        polls.sort_by(|a, b| a.target.cmp(&b.target));
        polls
    }

    /// Make a new poll the live one for `target`, cancelling its predecessor.
    fn register(&self, target: &str, session: Option<SessionId>) -> (u64, CancellationToken) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let entry = PollEntry {
            generation,
            cancel: cancel.clone(),
            phase: PollPhase::Requested,
            attempt: 0,
            session,
            started_at: Utc::now(),
        };

        if let Some(previous) = self.polls.insert(target.to_string(), entry) {
            previous.cancel.cancel();
            info!(target = %target, attempt = previous.attempt, "Superseded in-flight poll");
        }
        (generation, cancel)
    }

    /// Run `f` on the poll's entry if the poll is still live. The entry stays
    /// locked while `f` runs, so a newer poll cannot register in between.
    fn with_live<R>(
        &self,
        target: &str,
        generation: u64,
        f: impl FnOnce(&mut PollEntry) -> R,
    ) -> Option<R> {
        let mut entry = self.polls.get_mut(target)?;
        if entry.generation != generation || entry.cancel.is_cancelled() {
            return None;
        }
        Some(f(&mut entry))
    }

    fn update(&self, target: &str, generation: u64, phase: PollPhase, attempt: u32) {
        self.with_live(target, generation, |entry| {
            entry.phase = phase;
            entry.attempt = attempt;
        });
    }

    fn complete(
        &self,
        target: &str,
        generation: u64,
        result: ScanResult,
        options: &ScanOptions,
        observer: &dyn PollObserver,
    ) -> PollOutcome {
        let stored = self.with_live(target, generation, |_| {
            self.cache.put(
                target,
                result.clone(),
                options.ttl(),
                Some(Box::new(|target: &str| {
                    info!(target = %target, "Cached scan result expired");
                })),
            );
            observer.on_ready(target, &result);
        });

        match stored {
            Some(()) => {
                info!(target = %target, endpoints = result.endpoints.len(), "Scan ready");
                PollOutcome::Ready(result)
            }
            None => PollOutcome::Superseded,
        }
    }

    fn fail(
        &self,
        target: &str,
        generation: u64,
        error: GradewatchError,
        observer: &dyn PollObserver,
    ) -> Result<PollOutcome, GradewatchError> {
        let reported = self.with_live(target, generation, |_| observer.on_failed(target, &error));
        if reported.is_none() {
            debug!(target = %target, error = %error, "Dropping error from superseded poll");
            return Ok(PollOutcome::Superseded);
        }

        let class = error.classify();
        warn!(
            target = %target,
            error_type = class.error_type,
            target_scoped = class.target_scoped,
            error = %error,
            "Scan failed"
        );
        Err(error)
    }
}

impl std::fmt::Debug for ScanPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPoller")
            .field("service", &self.service.service_name())
            .field("policy", &self.policy)
            .field("in_flight", &self.polls.len())
            .finish()
    }
}
