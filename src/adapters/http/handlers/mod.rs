pub mod account;
pub mod metrics;

pub use account::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, signup_handler};
pub use metrics::metrics_handler;
