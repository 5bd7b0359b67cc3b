pub mod config;
pub mod error;
pub mod hasher;
pub mod loader;
pub mod model;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use loader::{load, LoadResult};
pub use model::{DuplicateSha256, FileMetadata, FileRecord};
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::{scan, ScanOptions, ScanResult};
pub use storage::{
    CountCache, Database, LookupColumn, LookupValue, QueryRequest, ReportView, SortDirection,
};
