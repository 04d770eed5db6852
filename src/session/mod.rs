pub mod hostname;
pub mod tracker;

pub use hostname::{hostname_of, is_qualified, qualified_hostname};
pub use tracker::SessionTracker;
