pub mod aggregator;
pub mod formatter;
pub mod launcher;
pub mod status;

pub use aggregator::aggregate;
pub use launcher::{LogLauncher, ReportLauncher, ReportView, ViewPlacement};
pub use status::{LogPublisher, MemoryPublisher, Status, StatusPublisher};
