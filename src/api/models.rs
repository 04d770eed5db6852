use serde::Serialize;

use crate::cache::CacheSnapshot;
use crate::config::Preferences;
use crate::pipeline::{NavigationOutcome, SessionView};
use crate::poller::PollSnapshot;
use crate::reporting::{ReportView, Status};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
    pub sessions: usize,
    pub cached: usize,
    pub polling: usize,
}

#[derive(Serialize)]
pub struct NavigationResponse {
    #[serde(flatten)]
    pub outcome: NavigationOutcome,
    pub hostname: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub view: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub session: u64,
    pub views: Vec<ReportView>,
}

#[derive(Serialize)]
pub struct PreferencesResponse {
    pub preferences: Preferences,
    pub depth_changed: bool,
}

#[derive(Serialize)]
pub struct CacheResponse {
    pub entries: Vec<CacheSnapshot>,
    pub in_flight: Vec<PollSnapshot>,
}
