use std::path::PathBuf;

use crate::cli::commands::ValidateArgs;
use crate::config;
use crate::errors::GradewatchError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), GradewatchError> {
    let path = PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;

    let prefs = config.preferences();
    let polling = config.polling();
    println!("Configuration is valid: {}", args.config);
    println!(
        "  preferences: auto={} maxAge={}h depth={} publish={} ignoreMismatch={}",
        prefs.auto, prefs.max_age, prefs.depth, prefs.publish, prefs.ignore_mismatch
    );
    println!("  scan api:    {}", config.service().api_url);
    println!(
        "  polling:     {}s in progress, {}s pending, {}",
        polling.in_progress_delay_secs,
        polling.pending_delay_secs,
        polling.max_polls.map_or("no poll limit".to_string(), |n| format!("at most {} polls", n)),
    );
    Ok(())
}
