pub mod error;
pub mod export;
pub mod human;
pub mod model;
pub mod options;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod stats;

pub use error::ScanError;
pub use model::*;
pub use options::*;
pub use progress::*;
pub use report::*;
pub use scanner::*;
