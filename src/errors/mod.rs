pub mod types;
pub mod classification;

pub use types::GradewatchError;
pub use classification::ErrorClassification;
