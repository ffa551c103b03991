//! Authentication module
//!
//! Supports: no auth, static bearer tokens, and Google service accounts.
//!
//! The `Authenticator` applies auth to outgoing requests and caches the
//! access token minted from a service-account key until shortly before
//! it expires.

mod authenticator;
mod types;

pub use authenticator::{sign_assertion, Authenticator};
pub use types::{AuthConfig, CachedToken, ServiceAccountKey, DATASTORE_SCOPE, GOOGLE_TOKEN_URI};
