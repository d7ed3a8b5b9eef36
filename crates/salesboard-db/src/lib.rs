pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

// Re-exports
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use models::TransactionRow;
pub use repository::Database;
pub use store::RecordStore;
