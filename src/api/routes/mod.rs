pub mod cache;
pub mod health;
pub mod navigation;
pub mod preferences;
pub mod sessions;
