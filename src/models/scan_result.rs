use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status reported by the scan service for one target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanStatus {
    Ready,
    InProgress,
    Error,
    /// Resolving the hostname, reported before the assessment starts.
    Dns,
    /// Any other non-terminal status string.
    Other(String),
}

impl ScanStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "READY",
            Self::InProgress => "IN_PROGRESS",
            Self::Error => "ERROR",
            Self::Dns => "DNS",
            Self::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

impl From<String> for ScanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "READY" => Self::Ready,
            "IN_PROGRESS" => Self::InProgress,
            "ERROR" => Self::Error,
            "DNS" => Self::Dns,
            _ => Self::Other(s),
        }
    }
}

impl From<ScanStatus> for String {
    fn from(status: ScanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One server behind the scanned hostname.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Letter grade; absent while the endpoint is unassessed or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Response body of the scan service's `analyze` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Remaining fields, kept untouched.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ScanResult {
    pub fn grades(&self) -> impl Iterator<Item = Option<&str>> {
        self.endpoints.iter().map(|e| e.grade.as_deref())
    }

    #[cfg(test)]
    pub(crate) fn with_grades(grades: &[Option<&str>]) -> Self {
        Self {
            host: None,
            status: ScanStatus::Ready,
            status_message: None,
            endpoints: grades
                .iter()
                .map(|g| Endpoint { grade: g.map(str::to_string), ..Default::default() })
                .collect(),
            payload: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ready_response() {
        let body = r#"{
            "host": "example.com",
            "port": 443,
            "status": "READY",
            "startTime": 1700000000000,
            "endpoints": [
                {"ipAddress": "93.184.216.34", "grade": "A+", "hasWarnings": false},
                {"ipAddress": "2606:2800:220:1::", "statusMessage": "Unable to connect"}
            ]
        }"#;
        let result: ScanResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.status, ScanStatus::Ready);
        assert_eq!(result.host.as_deref(), Some("example.com"));
        assert_eq!(result.endpoints.len(), 2);
        assert_eq!(result.endpoints[0].grade.as_deref(), Some("A+"));
        assert!(result.endpoints[1].grade.is_none());
        assert_eq!(result.payload["port"], 443);
        assert_eq!(result.endpoints[0].details["hasWarnings"], false);
    }

    #[test]
    fn test_parse_pending_without_endpoints() {
        let result: ScanResult = serde_json::from_str(r#"{"status": "DNS"}"#).unwrap();
        assert_eq!(result.status, ScanStatus::Dns);
        assert!(result.endpoints.is_empty());
        assert!(!result.status.is_terminal());
    }

    #[test]
    fn test_unknown_status_kept() {
        let result: ScanResult = serde_json::from_str(r#"{"status": "QUEUED"}"#).unwrap();
        assert_eq!(result.status, ScanStatus::Other("QUEUED".into()));
        assert_eq!(result.status.to_string(), "QUEUED");
    }

    #[test]
    fn test_missing_status_is_malformed() {
        assert!(serde_json::from_str::<ScanResult>(r#"{"endpoints": []}"#).is_err());
    }

    #[test]
    fn test_status_serializes_as_wire_string() {
        let json = serde_json::to_string(&ScanStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ScanStatus::Ready.is_terminal());
        assert!(ScanStatus::Error.is_terminal());
        assert!(!ScanStatus::InProgress.is_terminal());
    }
}
