pub mod commands;
pub mod grade;
pub mod scan;
pub mod serve;
pub mod validate;
pub mod watch;

pub use commands::{Cli, Commands};

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{self, GradewatchConfig};
use crate::errors::GradewatchError;
use crate::poller::{ScanService, ScriptedService, SslLabsClient};

/// Load the config file if one was given, defaults otherwise.
pub async fn load_config(path: Option<&str>) -> Result<GradewatchConfig, GradewatchError> {
    match path {
        Some(path) => config::parse_config(&PathBuf::from(path)).await,
        None => Ok(GradewatchConfig::default()),
    }
}

/// The live scan API, or canned responses from `replay` when given.
pub async fn build_service(
    config: &GradewatchConfig,
    replay: Option<&str>,
) -> Result<Arc<dyn ScanService>, GradewatchError> {
    match replay {
        Some(path) => {
            info!(replay = %path, "Replaying scan responses");
            Ok(Arc::new(ScriptedService::from_file(&PathBuf::from(path)).await?))
        }
        None => Ok(Arc::new(SslLabsClient::new(&config.service().api_url)?)),
    }
}
