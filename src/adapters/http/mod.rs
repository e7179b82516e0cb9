pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{AccountResponse, ErrorResponse, SignupRequest};
pub use errors::ApiError;
pub use handlers::{metrics_handler, signup_handler};
pub use middleware::{RequestId, RequestIdMiddleware};
pub use routes::{configure_account_routes, configure_ops_routes};
