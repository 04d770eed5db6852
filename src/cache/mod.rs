pub mod result_cache;

pub use result_cache::{CacheSnapshot, ExpiryCallback, ResultCache};
