use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::config::{GradewatchConfig, PollingConfig, Preferences, ReportConfig};
use crate::errors::GradewatchError;
use crate::models::{NavigationEvent, ScanResult, SessionId, Verdict};
use crate::poller::{PollObserver, PollPolicy, PollProgress, ScanOptions, ScanPoller, ScanService};
use crate::reporting::aggregate;
use crate::reporting::launcher::{launch_report, plan_report};
use crate::reporting::{ReportLauncher, ReportView, Status, StatusPublisher};
use crate::session::tracker::primary_first;
use crate::session::{qualified_hostname, SessionTracker};
use super::events::EnvironmentEvent;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub preferences: Preferences,
    pub polling: PollingConfig,
    pub report: ReportConfig,
    pub report_url: String,
}

impl From<&GradewatchConfig> for OrchestratorConfig {
    fn from(config: &GradewatchConfig) -> Self {
        Self {
            preferences: config.preferences(),
            polling: config.polling(),
            report: config.report(),
            report_url: config.service().report_url,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from(&GradewatchConfig::default())
    }
}

/// What a navigation event led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// Unqualified hostname or filtered request kind
    Ignored,
    /// Hostname recorded; no scan requested
    Tracked,
    /// Verdict published from the cache
    Cached(Verdict),
    /// A poll was started for the primary host
    ScanStarted,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Tracked hostnames, primary host first
    pub hostnames: Vec<String>,
}

/// Publishes a poll's effects to every session whose primary host is the
/// polled target.
struct SessionStatusObserver {
    primary: Arc<DashMap<SessionId, String>>,
    publisher: Arc<dyn StatusPublisher>,
}

impl SessionStatusObserver {
    fn publish_for(&self, target: &str, status: Status) {
        let sessions: Vec<SessionId> = self.primary
            .iter()
            .filter(|e| e.value() == target)
            .map(|e| *e.key())
            .collect();
        for session in sessions {
            self.publisher.publish(session, status.clone());
        }
    }
}

impl PollObserver for SessionStatusObserver {
    fn on_pending(&self, progress: &PollProgress) {
        self.publish_for(&progress.target, Status::pending());
    }

    fn on_ready(&self, target: &str, result: &ScanResult) {
        let verdict = aggregate(result);
        info!(target = %target, grade = %verdict.grade, tier = %verdict.tier, "Verdict");
        self.publish_for(target, Status::verdict(&verdict));
    }

    fn on_failed(&self, target: &str, error: &GradewatchError) {
        if error.classify().clears_status {
            self.publish_for(target, Status::cleared());
        }
    }
}

/// Turns environment events into scans, session statuses and reports.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct ScanOrchestrator {
    preferences: Arc<RwLock<Preferences>>,
    tracker: SessionTracker,
    poller: ScanPoller,
    publisher: Arc<dyn StatusPublisher>,
    launcher: Arc<dyn ReportLauncher>,
    /// Top-level host currently shown in each session
    primary: Arc<DashMap<SessionId, String>>,
    report: ReportConfig,
    report_url: String,
    tasks: TaskTracker,
}

impl ScanOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        service: Arc<dyn ScanService>,
        publisher: Arc<dyn StatusPublisher>,
        launcher: Arc<dyn ReportLauncher>,
    ) -> Self {
        let poller = ScanPoller::new(service, ResultCache::new(), PollPolicy::from(&config.polling));
        Self {
            preferences: Arc::new(RwLock::new(config.preferences)),
            tracker: SessionTracker::new(),
            poller,
            publisher,
            launcher,
            primary: Arc::new(DashMap::new()),
            report: config.report,
            report_url: config.report_url,
            tasks: TaskTracker::new(),
        }
    }

    pub fn poller(&self) -> &ScanPoller {
        &self.poller
    }

    pub fn cache(&self) -> &ResultCache {
        self.poller.cache()
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub async fn preferences(&self) -> Preferences {
        self.preferences.read().await.clone()
    }

    /// Handle one request observed in a session.
    pub async fn handle_navigation(&self, event: NavigationEvent) -> NavigationOutcome {
        let prefs = self.preferences().await;
        let session = event.session;

        let Some(hostname) = qualified_hostname(&event.url) else {
            if event.kind.is_top_level() && self.primary.remove(&session).is_some() {
                self.publisher.publish(session, Status::cleared());
            }
            debug!(session, url = %event.url, "Ignoring unqualified hostname");
            return NavigationOutcome::Ignored;
        };

        let tracked = prefs.depth.accepts(event.kind);
        if tracked {
            self.tracker.record_visit(session, &hostname).await;
        }

        if !event.kind.is_top_level() {
            return if tracked { NavigationOutcome::Tracked } else { NavigationOutcome::Ignored };
        }

        // The old host's grade must not linger on the new host
        let previous = self.primary.insert(session, hostname.clone());
        if previous.is_some_and(|p| p != hostname) {
            self.publisher.publish(session, Status::cleared());
        }
        if !prefs.auto {
            return NavigationOutcome::Tracked;
        }

        if let Some(result) = self.cache().get(&hostname) {
            let verdict = aggregate(&result);
            debug!(session, target = %hostname, grade = %verdict.grade, "Cache hit");
            self.publisher.publish(session, Status::verdict(&verdict));
            return NavigationOutcome::Cached(verdict);
        }

        self.spawn_scan(hostname, ScanOptions::from(&prefs), session);
        NavigationOutcome::ScanStarted
    }

    /// Scan `host` regardless of the `auto` preference and wait for the verdict.
    /// Returns `None` if a newer scan of the same host took over.
    pub async fn scan_host(&self, host: &str) -> Result<Option<Verdict>, GradewatchError> {
        let hostname = qualified_hostname(host)
            .ok_or_else(|| GradewatchError::InvalidTarget(host.to_string()))?;

        if let Some(result) = self.cache().get(&hostname) {
            return Ok(Some(aggregate(&result)));
        }

        let options = ScanOptions::from(&self.preferences().await);
        let observer = self.observer();
        let outcome = self.poller.ensure_scanned(&hostname, &options, None, &observer).await?;
        Ok(outcome.into_result().map(|result| aggregate(&result)))
    }

    /// Open one report view per tracked hostname of `session`, primary host
    /// first. Views open in the background; the plan is returned right away.
    pub async fn request_report(&self, session: SessionId) -> Result<Vec<ReportView>, GradewatchError> {
        let primary = self.primary
            .get(&session)
            .map(|p| p.value().clone())
            .ok_or(GradewatchError::SessionNotFound(session))?;
        let hostnames = self.tracker
            .hostnames(session)
            .await
            .ok_or(GradewatchError::SessionNotFound(session))?;

        let ordered = primary_first(hostnames, &primary);
        let prefs = self.preferences().await;
        let views = plan_report(&ordered, &prefs, &self.report, &self.report_url)?;
        if views.is_empty() {
            info!(session, "No hostnames to report");
            return Ok(views);
        }

        info!(session, views = views.len(), primary = %primary, "Opening report");
        let launcher = Arc::clone(&self.launcher);
        let to_open = views.clone();
        let width = self.report.window_width;
        self.tasks.spawn(async move {
            match launch_report(launcher.as_ref(), &to_open, width).await {
                Ok(opened) => debug!(session, opened, "Report views opened"),
                Err(e) => warn!(session, error = %e, "Report launch failed"),
            }
        });

        Ok(views)
    }

    /// Replace the preferences. A depth change clears every session's
    /// hostnames since they were gathered under the old filter; polls in
    /// flight are left alone. Returns whether the depth changed.
    pub async fn update_preferences(&self, prefs: Preferences) -> Result<bool, GradewatchError> {
        if prefs.max_age == 0 {
            return Err(GradewatchError::Config("maxAge must be at least 1 hour".into()));
        }

        let depth = prefs.depth;
        let depth_changed = {
            let mut current = self.preferences.write().await;
            let changed = current.depth != prefs.depth;
            *current = prefs;
            changed
        };

        if depth_changed {
            self.tracker.reset_all().await;
            info!(depth = %depth, "Depth changed, cleared tracked hostnames");
        }
        Ok(depth_changed)
    }

    /// Forget a session that has ended.
    pub async fn close_session(&self, session: SessionId) -> bool {
        let tracked = self.tracker.remove(session).await;
        let shown = self.primary.remove(&session).is_some();
        self.publisher.forget(session);
        tracked || shown
    }

    pub async fn session(&self, session: SessionId) -> Option<SessionView> {
        let primary = self.primary.get(&session).map(|p| p.value().clone());
        let hostnames = self.tracker.hostnames(session).await;
        if primary.is_none() && hostnames.is_none() {
            return None;
        }

        let hostnames = hostnames.unwrap_or_default();
        let hostnames = match &primary {
            Some(p) => primary_first(hostnames, p),
            None => hostnames,
        };
        Some(SessionView { session, primary, hostnames })
    }

    /// Apply one environment event. Errors concern that event only.
    pub async fn dispatch(&self, event: EnvironmentEvent) -> Result<(), GradewatchError> {
        match event {
            EnvironmentEvent::Navigate(nav) => {
                let outcome = self.handle_navigation(nav).await;
                debug!(?outcome, "Navigation handled");
            }
            EnvironmentEvent::Report { session } => {
                self.request_report(session).await?;
            }
            EnvironmentEvent::Preferences(prefs) => {
                self.update_preferences(prefs).await?;
            }
            EnvironmentEvent::Close { session } => {
                self.close_session(session).await;
            }
        }
        Ok(())
    }

    /// Wait for every background poll and report launch to finish.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn observer(&self) -> SessionStatusObserver {
        SessionStatusObserver {
            primary: Arc::clone(&self.primary),
            publisher: Arc::clone(&self.publisher),
        }
    }

    fn spawn_scan(&self, target: String, options: ScanOptions, session: SessionId) {
        let poller = self.poller.clone();
        let observer = self.observer();
        info!(session, target = %target, "Starting scan");
        self.tasks.spawn(async move {
            // Failures are logged by the poller and published by the observer
            let _ = poller.ensure_scanned(&target, &options, Some(session), &observer).await;
        });
    }
}

impl std::fmt::Debug for ScanOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOrchestrator")
            .field("poller", &self.poller)
            .field("sessions", &self.primary.len())
            .finish()
    }
}
