//! Recording module: activity types, FIT parsing and ingestion.

pub mod fit;
pub mod loader;
pub mod types;

pub use loader::{load_directory, load_file, LoadSummary};
pub use types::{Activity, ImportError, ParsedRecording, TimeSeries};
