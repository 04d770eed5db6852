use serde::{Deserialize, Serialize};
use crate::models::navigation::RequestKind;

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GradewatchConfig {
    pub preferences: Option<Preferences>,
    pub service: Option<ServiceConfig>,
    pub polling: Option<PollingConfig>,
    pub report: Option<ReportConfig>,
}

/// User preferences, as stored by the preferences form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Scan automatically on every top-level navigation.
    pub auto: bool,
    /// Freshness window in hours, also the cache ttl.
    pub max_age: u32,
    pub depth: Depth,
    /// Allow the scan service to list results publicly.
    pub publish: bool,
    /// Tolerate certificate / hostname mismatches.
    pub ignore_mismatch: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto: true,
            max_age: 72,
            depth: Depth::Doc,
            publish: true,
            ignore_mismatch: false,
        }
    }
}

/// Which request kinds contribute hostnames to a session.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Top-level documents only
    #[default]
    Doc,
    /// Documents, frames, scripts and async requests
    Js,
    /// Every resource kind
    All,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Js => "js",
            Self::All => "all",
        }
    }

    /// Request kinds observed at this depth.
    pub fn request_kinds(&self) -> &'static [RequestKind] {
        match self {
            Self::Doc => &[RequestKind::MainFrame],
            Self::Js => &[
                RequestKind::MainFrame,
                RequestKind::SubFrame,
                RequestKind::XmlHttpRequest,
                RequestKind::Script,
            ],
            Self::All => RequestKind::ALL,
        }
    }

    pub fn accepts(&self, kind: RequestKind) -> bool {
        self.request_kinds().contains(&kind)
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doc" => Ok(Self::Doc),
            "js" => Ok(Self::Js),
            "all" => Ok(Self::All),
            other => Err(format!("unknown depth '{}', expected doc, js or all", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Scan API endpoint (`analyze` is appended).
    pub api_url: String,
    /// Human-facing report page, the hostname is appended to it.
    pub report_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.ssllabs.com/api/v2".to_string(),
            report_url: "https://www.ssllabs.com/ssltest/analyze.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay before re-polling a scan reported as `IN_PROGRESS`.
    pub in_progress_delay_secs: u64,
    /// Delay before re-polling any other pending status.
    pub pending_delay_secs: u64,
    /// Upper bound on requests per scan. `None` polls until terminal.
    pub max_polls: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            in_progress_delay_secs: 10,
            pending_delay_secs: 5,
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Interval between opening consecutive report views.
    pub stagger_ms: u64,
    pub window_width: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 1000,
            window_width: 1102,
        }
    }
}

impl GradewatchConfig {
    pub fn preferences(&self) -> Preferences {
        self.preferences.clone().unwrap_or_default()
    }

    pub fn service(&self) -> ServiceConfig {
        self.service.clone().unwrap_or_default()
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling.clone().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }
}
