pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod progress;
pub mod request;
pub mod scanner;

pub use config::AppConfig;
pub use counter::{DocumentSummary, ElementInfo, ParseError};
pub use engine::{CountEngine, DebugSample, ParseOutcome, ScanResult, SkippedFile};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use request::{ScanRequest, DEFAULT_EXTENSIONS};
