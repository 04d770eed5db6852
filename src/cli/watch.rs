use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::commands::WatchArgs;
use crate::errors::GradewatchError;
use crate::pipeline::{parse_event_line, OrchestratorConfig, ScanOrchestrator};
use crate::reporting::{LogLauncher, LogPublisher};

pub async fn handle_watch(args: WatchArgs) -> Result<(), GradewatchError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let service = super::build_service(&config, args.replay.as_deref()).await?;
    let orchestrator = ScanOrchestrator::new(
        OrchestratorConfig::from(&config),
        service,
        Arc::new(LogPublisher),
        Arc::new(LogLauncher::default()),
    );

    let handled = match &args.events {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            run_events(&orchestrator, BufReader::new(file)).await?
        }
        None => run_events(&orchestrator, BufReader::new(tokio::io::stdin())).await?,
    };

    info!(events = handled, "Event stream ended, waiting for scans");
    orchestrator.drain().await;
    Ok(())
}

/// Dispatch every event line from `reader`. A bad line is logged and
/// skipped. Returns the number of events applied.
pub async fn run_events<R>(orchestrator: &ScanOrchestrator, reader: R) -> Result<usize, GradewatchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let event = match parse_event_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event");
                continue;
            }
        };

        match orchestrator.dispatch(event).await {
            Ok(()) => handled += 1,
            Err(e) => {
                let class = e.classify();
                warn!(
                    line = line_no,
                    error_type = class.error_type,
                    target_scoped = class.target_scoped,
                    error = %e,
                    "Event failed"
                );
            }
        }
    }

    Ok(handled)
}
