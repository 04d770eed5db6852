pub mod client;
pub mod engine;
pub mod scripted;
pub mod state;

pub use client::{ScanService, SslLabsClient};
pub use engine::{PollObserver, ScanPoller};
pub use scripted::{ScriptedResponse, ScriptedService};
pub use state::{PollOutcome, PollPhase, PollPolicy, PollProgress, PollSnapshot, ScanOptions};
