use std::path::Path;
use crate::errors::GradewatchError;
use super::types::GradewatchConfig;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;
const MAX_STAGGER_MS: u64 = 60_000;

pub async fn parse_config(path: &Path) -> Result<GradewatchConfig, GradewatchError> {
    if !path.exists() {
        return Err(GradewatchError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(GradewatchError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<GradewatchConfig, GradewatchError> {
    // An empty file is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(GradewatchConfig::default());
    }

    let config: GradewatchConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Detect values the poller and report launcher cannot work with.
pub fn validate_config(config: &GradewatchConfig) -> Result<(), GradewatchError> {
    if let Some(prefs) = &config.preferences {
        if prefs.max_age == 0 {
            return Err(GradewatchError::Config("preferences.maxAge must be at least 1 hour".into()));
        }
    }

    if let Some(polling) = &config.polling {
        if polling.in_progress_delay_secs == 0 || polling.pending_delay_secs == 0 {
            return Err(GradewatchError::Config("polling delays must be positive".into()));
        }
        if polling.max_polls == Some(0) {
            return Err(GradewatchError::Config("polling.max_polls must be at least 1".into()));
        }
    }

    if let Some(service) = &config.service {
        validate_url("service.api_url", &service.api_url)?;
        validate_url("service.report_url", &service.report_url)?;
        if service.api_url.starts_with("http://") {
            warn!(api_url = %service.api_url, "Scan service configured over plain HTTP");
        }
    }

    if let Some(report) = &config.report {
        if report.stagger_ms > MAX_STAGGER_MS {
            return Err(GradewatchError::Config(format!(
                "report.stagger_ms must not exceed {}ms", MAX_STAGGER_MS
            )));
        }
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), GradewatchError> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| GradewatchError::Config(format!("{} is not a valid URL: {}", field, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(GradewatchError::Config(format!(
            "{} must use http or https, got '{}'", field, other
        ))),
    }
}
