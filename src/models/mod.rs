pub mod grade;
pub mod navigation;
pub mod scan_result;
pub mod verdict;

pub use grade::*;
pub use navigation::*;
pub use scan_result::*;
pub use verdict::*;
