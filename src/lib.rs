//! Process-local cached access to the shared HMAC key and access token.
//!
//! [`CredentialCache`] fetches the singleton [`Credentials`] record from a
//! [`CredentialStore`] on first use and serves it from memory afterwards.

pub mod cache;
pub mod context;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod store;

pub use cache::CredentialCache;
pub use context::RequestContext;
pub use credentials::Credentials;
pub use error::CredentialError;
pub use store::{CredentialStore, S3CredentialStore, StoreConfig};
