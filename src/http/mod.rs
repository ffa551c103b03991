//! HTTP client module
//!
//! Thin wrapper over `reqwest` used by the store client.
//!
//! # Features
//!
//! - **Authentication**: every attempt goes through the `Authenticator`
//! - **Timeouts**: one per-request timeout for the whole client
//! - **Retries**: off by default, opt-in with exponential backoff
//! - **Rate Limiting**: optional per-second cap using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig};
pub use rate_limit::RateLimiter;
