pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{Settings, StoreKind};
pub use cors::OriginPolicy;
pub use error::{ApiError, ErrorKind};
pub use routes::create_router;
pub use state::ApiState;
