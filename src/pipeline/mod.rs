pub mod events;
pub mod orchestrator;

pub use events::{parse_event_line, EnvironmentEvent};
pub use orchestrator::{NavigationOutcome, OrchestratorConfig, ScanOrchestrator, SessionView};
