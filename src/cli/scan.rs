use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cli::commands::ScanArgs;
use crate::config::Preferences;
use crate::errors::GradewatchError;
use crate::models::Verdict;
use crate::pipeline::{OrchestratorConfig, ScanOrchestrator};
use crate::reporting::formatter::{format_scan_line, ScanLine};
use crate::reporting::{LogLauncher, LogPublisher};
use crate::session::qualified_hostname;

#[derive(Serialize)]
struct HostReport {
    host: String,
    #[serde(flatten)]
    verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn handle_scan(args: ScanArgs) -> Result<(), GradewatchError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let service = super::build_service(&config, args.replay.as_deref()).await?;

    let mut orchestrator_config = OrchestratorConfig::from(&config);
    apply_overrides(&mut orchestrator_config.preferences, &args);
    let orchestrator = ScanOrchestrator::new(
        orchestrator_config,
        service,
        Arc::new(LogPublisher),
        Arc::new(LogLauncher::default()),
    );

    let hosts = distinct_hosts(&args.hosts);
    info!(hosts = hosts.len(), "Scanning");
    let outcomes = futures::future::join_all(hosts.iter().map(|h| orchestrator.scan_host(h))).await;

    let mut failed = 0;
    let mut reports = Vec::with_capacity(hosts.len());
    for (host, outcome) in hosts.iter().zip(&outcomes) {
        let line = match outcome {
            Ok(Some(verdict)) => ScanLine::Graded(verdict),
            Ok(None) => ScanLine::Superseded,
            Err(e) => {
                failed += 1;
                ScanLine::Failed(e)
            }
        };
        if args.json {
            reports.push(HostReport {
                host: host.clone(),
                verdict: outcome.as_ref().ok().and_then(|v| v.clone()),
                error: outcome.as_ref().err().map(|e| e.to_string()),
            });
        } else {
            println!("{}", format_scan_line(host, &line));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failed > 0 {
        return Err(GradewatchError::ScanService(format!(
            "{} of {} scans failed", failed, hosts.len()
        )));
    }
    Ok(())
}

/// Command-line flags take precedence over the config file.
pub fn apply_overrides(prefs: &mut Preferences, args: &ScanArgs) {
    if let Some(max_age) = args.max_age {
        prefs.max_age = max_age;
    }
    if args.no_publish {
        prefs.publish = false;
    }
    if args.ignore_mismatch {
        prefs.ignore_mismatch = true;
    }
}

/// Normalized hostnames in first-seen order. Inputs that are not qualified
/// hostnames are kept as given so the scan reports them as invalid.
fn distinct_hosts(inputs: &[String]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let host = qualified_hostname(input).unwrap_or_else(|| input.clone());
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}
