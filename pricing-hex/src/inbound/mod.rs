//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server exposing the `get-exchange-rates` proxy.

mod handlers;
mod rate_limit;
mod server;

pub use handlers::ALLOWED_HEADERS;
pub use rate_limit::RateLimiterState;
pub use server::HttpServer;
