pub mod error;
pub mod importer;

// Re-exports
pub use error::{Error, Result};
pub use importer::{DatasetImporter, FetchedBatch, ImportReport, DEFAULT_DATASET_URL};
