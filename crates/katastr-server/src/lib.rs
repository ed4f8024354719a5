//! HTTP surface of the cadastral gateway.

pub mod cors;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod scope;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use scope::RequestScope;
pub use state::{AppState, TtlPolicy};
