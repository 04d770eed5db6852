use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::errors::GradewatchError;
use crate::models::ScanResult;
use super::state::ScanOptions;

/// External service that runs TLS assessments.
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Request (or re-request) the assessment of `target`. Each call returns
    /// the service's current view, which may still be pending.
    async fn analyze(
        &self,
        target: &str,
        options: &ScanOptions,
    ) -> Result<ScanResult, GradewatchError>;

    /// Service name for logging
    fn service_name(&self) -> &str;
}

/// Client for the SSL Labs assessment API.
pub struct SslLabsClient {
    client: Client,
    api_url: String,
}

impl SslLabsClient {
    pub fn new(api_url: &str) -> Result<Self, GradewatchError> {
        let client = Client::builder()
            .user_agent(concat!("gradewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GradewatchError::Internal(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// `analyze` URL for `target`. Cached assessments are accepted and the
    /// full endpoint details are requested once the assessment is done.
    pub fn analyze_url(&self, target: &str, options: &ScanOptions) -> Result<Url, GradewatchError> {
        let max_age = options.max_age_hours.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("fromCache", "on"),
            ("all", "done"),
            ("host", target),
        ];
        if options.max_age_hours > 0 {
            params.push(("maxAge", &max_age));
        }
        if options.publish {
            params.push(("publish", "on"));
        }
        if options.ignore_mismatch {
            params.push(("ignoreMismatch", "on"));
        }

        Url::parse_with_params(&format!("{}/analyze", self.api_url), &params)
            .map_err(|e| GradewatchError::Config(format!("Invalid scan API URL: {}", e)))
    }
}

#[async_trait]
impl ScanService for SslLabsClient {
    async fn analyze(
        &self,
        target: &str,
        options: &ScanOptions,
    ) -> Result<ScanResult, GradewatchError> {
        let url = self.analyze_url(target, options)?;
        debug!(target = %target, url = %url, "Requesting assessment");

        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| GradewatchError::Transport(format!("Scan request for {} failed: {}", target, e)))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(GradewatchError::Transport(format!(
                "Scan service overloaded (HTTP {})", status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(GradewatchError::Transport(format!(
                "Scan service returned HTTP {}", status.as_u16()
            )));
        }

        let body = resp.text().await
            .map_err(|e| GradewatchError::Transport(format!("Reading scan response failed: {}", e)))?;
        parse_scan_response(&body)
    }

    fn service_name(&self) -> &str { "ssllabs" }
}

/// Decode an `analyze` response body.
pub fn parse_scan_response(body: &str) -> Result<ScanResult, GradewatchError> {
    serde_json::from_str(body)
        .map_err(|e| GradewatchError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanStatus;

    fn client() -> SslLabsClient {
        SslLabsClient::new("https://api.ssllabs.com/api/v2/").unwrap()
    }

    #[test]
    fn test_analyze_url_defaults() {
        let url = client().analyze_url("example.com", &ScanOptions::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ssllabs.com/api/v2/analyze?fromCache=on&all=done&host=example.com&maxAge=72&publish=on"
        );
    }

    #[test]
    fn test_analyze_url_private_with_mismatch() {
        let options = ScanOptions { max_age_hours: 1, publish: false, ignore_mismatch: true };
        let url = client().analyze_url("example.com", &options).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("maxAge=1"));
        assert!(!query.contains("publish"));
        assert!(query.ends_with("ignoreMismatch=on"));
    }

    #[test]
    fn test_parse_scan_response_error_status() {
        let result = parse_scan_response(
            r#"{"host":"nx.example","status":"ERROR","statusMessage":"Unable to resolve domain name"}"#,
        ).unwrap();
        assert_eq!(result.status, ScanStatus::Error);
        assert_eq!(result.status_message.as_deref(), Some("Unable to resolve domain name"));
    }

    #[test]
    fn test_parse_scan_response_malformed() {
        let err = parse_scan_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GradewatchError::MalformedResponse(_)));
    }
}
