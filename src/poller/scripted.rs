//! Scan service that replays canned responses, for offline runs and tests.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::GradewatchError;
use crate::models::ScanResult;
use super::client::{parse_scan_response, ScanService};
use super::state::ScanOptions;

#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Result(ScanResult),
    /// Raw body that is handed to the response parser.
    Body(String),
    TransportFailure(String),
}

/// Answers each target from its own queue of responses. The last response of
/// a queue is repeated once the queue runs dry.
#[derive(Default)]
pub struct ScriptedService {
    scripts: DashMap<String, VecDeque<ScriptedResponse>>,
    calls: DashMap<String, usize>,
    total_calls: AtomicUsize,
    latency: Mutex<Option<Duration>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{ "host": [response, ...] }` from a JSON file.
    pub async fn from_file(path: &Path) -> Result<Self, GradewatchError> {
        let content = tokio::fs::read_to_string(path).await?;
        let scripts: HashMap<String, Vec<ScanResult>> = serde_json::from_str(&content)?;

        let service = Self::new();
        for (target, results) in scripts {
            for result in results {
                service.push(&target, ScriptedResponse::Result(result));
            }
        }
        Ok(service)
    }

    pub fn push(&self, target: &str, response: ScriptedResponse) -> &Self {
        self.scripts.entry(target.to_string()).or_default().push_back(response);
        self
    }

    pub fn push_body(&self, target: &str, body: &str) -> &Self {
        self.push(target, ScriptedResponse::Body(body.to_string()))
    }

    /// Delay every response by `latency` to keep requests in flight.
    pub fn with_latency(self, latency: Duration) -> Self {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = Some(latency);
        }
        self
    }

    pub fn calls(&self, target: &str) -> usize {
        self.calls.get(target).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    fn next_response(&self, target: &str) -> Option<ScriptedResponse> {
        let mut queue = self.scripts.get_mut(target)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ScanService for ScriptedService {
    async fn analyze(
        &self,
        target: &str,
        _options: &ScanOptions,
    ) -> Result<ScanResult, GradewatchError> {
        *self.calls.entry(target.to_string()).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency.lock().ok().and_then(|l| *l);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_response(target) {
            Some(ScriptedResponse::Result(result)) => Ok(result),
            Some(ScriptedResponse::Body(body)) => parse_scan_response(&body),
            Some(ScriptedResponse::TransportFailure(message)) => Err(GradewatchError::Transport(message)),
            None => Err(GradewatchError::Transport(format!("No scripted response for {}", target))),
        }
    }

    fn service_name(&self) -> &str { "scripted" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanStatus;
    use std::io::Write;

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let service = ScriptedService::new();
        service
            .push_body("a.com", r#"{"status":"IN_PROGRESS"}"#)
            .push_body("a.com", r#"{"status":"READY","endpoints":[{"grade":"A"}]}"#);

        let options = ScanOptions::default();
        assert_eq!(service.analyze("a.com", &options).await.unwrap().status, ScanStatus::InProgress);
        assert_eq!(service.analyze("a.com", &options).await.unwrap().status, ScanStatus::Ready);
        assert_eq!(service.analyze("a.com", &options).await.unwrap().status, ScanStatus::Ready);
        assert_eq!(service.calls("a.com"), 3);
    }

    #[tokio::test]
    async fn test_unknown_target_is_transport_failure() {
        let service = ScriptedService::new();
        let err = service.analyze("nobody.example", &ScanOptions::default()).await.unwrap_err();
        assert!(matches!(err, GradewatchError::Transport(_)));
        assert_eq!(service.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"a.com": [{{"status": "DNS"}}, {{"status": "READY", "endpoints": [{{"grade": "B"}}]}}]}}"#
        ).unwrap();

        let service = ScriptedService::from_file(file.path()).await.unwrap();
        let options = ScanOptions::default();
        assert_eq!(service.analyze("a.com", &options).await.unwrap().status, ScanStatus::Dns);
        let ready = service.analyze("a.com", &options).await.unwrap();
        assert_eq!(ready.endpoints[0].grade.as_deref(), Some("B"));
    }
}
