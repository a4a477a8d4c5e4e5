//! Remote storage for the singleton credential record.
//!
//! [`CredentialStore`] is the async trait for fetching the record.
//! [`S3CredentialStore`] implements it on top of an S3 bucket, addressed by a
//! [`StoreConfig`].

mod config;
mod s3;

pub use config::StoreConfig;
pub use s3::S3CredentialStore;

use std::sync::Arc;

use crate::credentials::Credentials;
use crate::error::CredentialError;

/// Point lookup of the one credential record kept by a store.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn fetch_singleton(&self) -> Result<Credentials, CredentialError>;
}

#[async_trait::async_trait]
impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    async fn fetch_singleton(&self) -> Result<Credentials, CredentialError> {
        (**self).fetch_singleton().await
    }
}
