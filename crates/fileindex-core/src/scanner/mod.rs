pub mod walk;

pub use walk::{scan, volume_relative_dir, ScanOptions, ScanResult};
