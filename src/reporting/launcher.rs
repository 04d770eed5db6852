use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Preferences, ReportConfig};
use crate::errors::GradewatchError;

/// Identifier of the window a multi-host report opens into.
pub type WindowId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPlacement {
    /// Replaces the page in the report window's first tab.
    CurrentTab,
    /// Opens as an additional tab in the report window.
    NewTab,
}

/// One report page to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub hostname: String,
    pub url: String,
    pub placement: ViewPlacement,
    /// Offset from the start of the launch.
    #[serde(rename = "delay_ms", serialize_with = "serialize_millis")]
    pub delay: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Report page URL for `hostname`, carrying the visibility and mismatch options.
pub fn report_url(base: &str, hostname: &str, prefs: &Preferences) -> Result<String, GradewatchError> {
    let mut params: Vec<(&str, &str)> = vec![("d", hostname)];
    if !prefs.publish {
        params.push(("hideResults", "on"));
    }
    if prefs.ignore_mismatch {
        params.push(("ignoreMismatch", "on"));
        params.push(("clearCache", "on"));
    }

    let url = reqwest::Url::parse_with_params(base, &params)
        .map_err(|e| GradewatchError::Config(format!("Invalid report URL '{}': {}", base, e)))?;
    Ok(url.to_string())
}

/// Views for `hostnames` in order: the first reuses the current tab, the rest
/// open as new tabs, each `stagger_ms` after the previous one.
pub fn plan_report(
    hostnames: &[String],
    prefs: &Preferences,
    config: &ReportConfig,
    base_url: &str,
) -> Result<Vec<ReportView>, GradewatchError> {
    hostnames
        .iter()
        .enumerate()
        .map(|(index, hostname)| -> Result<ReportView, GradewatchError> {
            Ok(ReportView {
                hostname: hostname.clone(),
                url: report_url(base_url, hostname, prefs)?,
                placement: if index == 0 { ViewPlacement::CurrentTab } else { ViewPlacement::NewTab },
                delay: Duration::from_millis(config.stagger_ms.saturating_mul(index as u64)),
            })
        })
        .collect()
}

/// Opens report pages (browser windows and tabs in the extension).
#[async_trait]
pub trait ReportLauncher: Send + Sync {
    async fn open_window(&self, width: u32) -> Result<WindowId, GradewatchError>;

    async fn open_view(&self, window: WindowId, view: &ReportView) -> Result<(), GradewatchError>;
}

/// Open a window and every view in it, honoring each view's delay.
/// Returns how many views were opened; a view that fails to open is logged
/// and skipped.
pub async fn launch_report(
    launcher: &dyn ReportLauncher,
    views: &[ReportView],
    window_width: u32,
) -> Result<usize, GradewatchError> {
    if views.is_empty() {
        return Ok(0);
    }

    let window = launcher.open_window(window_width).await?;
    let start = tokio::time::Instant::now();
    let mut opened = 0;

    for view in views {
        tokio::time::sleep_until(start + view.delay).await;
        match launcher.open_view(window, view).await {
            Ok(()) => opened += 1,
            Err(e) => warn!(hostname = %view.hostname, error = %e, "Failed to open report view"),
        }
    }

    Ok(opened)
}

/// Logs report views instead of opening them.
#[derive(Debug, Default)]
pub struct LogLauncher {
    next_window: AtomicU64,
}

#[async_trait]
impl ReportLauncher for LogLauncher {
    async fn open_window(&self, width: u32) -> Result<WindowId, GradewatchError> {
        let window = self.next_window.fetch_add(1, Ordering::Relaxed) + 1;
        info!(window, width, "Report window");
        Ok(window)
    }

    async fn open_view(&self, window: WindowId, view: &ReportView) -> Result<(), GradewatchError> {
        info!(window, hostname = %view.hostname, url = %view.url, placement = ?view.placement, "Report view");
        Ok(())
    }
}
