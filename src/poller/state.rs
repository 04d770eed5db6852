use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{PollingConfig, Preferences};
use crate::models::{ScanResult, ScanStatus, SessionId};

/// Parameters sent with every scan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Oldest acceptable cached assessment on the service side, in hours.
    pub max_age_hours: u32,
    pub publish: bool,
    pub ignore_mismatch: bool,
}

impl ScanOptions {
    /// Local cache lifetime for a result fetched with these options.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_age_hours) * 60 * 60)
    }
}

impl From<&Preferences> for ScanOptions {
    fn from(prefs: &Preferences) -> Self {
        Self {
            max_age_hours: prefs.max_age,
            publish: prefs.publish,
            ignore_mismatch: prefs.ignore_mismatch,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&Preferences::default())
    }
}

/// Re-poll timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub in_progress_delay: Duration,
    pub pending_delay: Duration,
    pub max_polls: Option<u32>,
}

impl PollPolicy {
    /// Delay before the next poll, `None` for terminal statuses.
    pub fn delay_for(&self, status: &ScanStatus) -> Option<Duration> {
        match status {
            ScanStatus::Ready | ScanStatus::Error => None,
            ScanStatus::InProgress => Some(self.in_progress_delay),
            ScanStatus::Dns | ScanStatus::Other(_) => Some(self.pending_delay),
        }
    }

    pub fn allows_another(&self, polls_made: u32) -> bool {
        self.max_polls.map_or(true, |max| polls_made < max)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            in_progress_delay: Duration::from_secs(config.in_progress_delay_secs),
            pending_delay: Duration::from_secs(config.pending_delay_secs),
            max_polls: config.max_polls,
        }
    }
}

/// Where a live poll currently is. A target with no live poll is either not
/// started or already terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PollPhase {
    /// A request to the scan service is outstanding.
    Requested,
    /// Waiting for the retry timer.
    AwaitingRetry {
        #[serde(rename = "delay_secs", serialize_with = "serialize_secs")]
        delay: Duration,
    },
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Reported each time a poll enters `AwaitingRetry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    pub target: String,
    /// Requests made so far, including the one that returned `status`.
    pub attempt: u32,
    pub status: ScanStatus,
    pub delay: Duration,
}

/// How a poll ended without error.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Ready(ScanResult),
    /// A newer poll for the same target took over; nothing was cached or reported.
    Superseded,
}

impl PollOutcome {
    pub fn into_result(self) -> Option<ScanResult> {
        match self {
            PollOutcome::Ready(result) => Some(result),
            PollOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PollSnapshot {
    pub target: String,
    #[serde(flatten)]
    pub phase: PollPhase,
    pub attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionId>,
    pub started_at: DateTime<Utc>,
}
