//! Lazy, load-once cache in front of a [`CredentialStore`].
//!
//! The first accessor call on a cold cache performs a single point lookup and
//! stores the record for the lifetime of the cache. Concurrent cold callers
//! share one in-flight fetch. A failed fetch caches nothing, so the next call
//! tries again.

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::context::RequestContext;
use crate::credentials::Credentials;
use crate::error::CredentialError;
use crate::store::CredentialStore;

/// Serves the secret key and access token, fetching them at most once.
///
/// Construct one per process and share it by reference (or `Arc`) with
/// whatever handles requests.
pub struct CredentialCache<S> {
    store: S,
    creds: OnceCell<Credentials>,
}

impl<S: CredentialStore> CredentialCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            creds: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns `true` once a fetch has succeeded.
    pub fn is_warm(&self) -> bool {
        self.creds.initialized()
    }

    /// The shared key used to verify HMAC signatures on incoming events.
    pub async fn secret_key(&self, ctx: &RequestContext) -> Result<Bytes, CredentialError> {
        Ok(self.load(ctx).await?.secret_key.clone())
    }

    /// The bearer token used to authenticate outbound requests.
    pub async fn access_token(&self, ctx: &RequestContext) -> Result<String, CredentialError> {
        Ok(self.load(ctx).await?.access_token.clone())
    }

    async fn load(&self, ctx: &RequestContext) -> Result<&Credentials, CredentialError> {
        if let Some(creds) = self.creds.get() {
            return Ok(creds);
        }

        let init = self.creds.get_or_try_init(|| self.fetch());
        match ctx.deadline() {
            Some(deadline) => tokio::time::timeout_at(deadline, init)
                .await
                .map_err(CredentialError::transport)?,
            None => init.await,
        }
    }

    async fn fetch(&self) -> Result<Credentials, CredentialError> {
        debug!("Credential cache cold, fetching record");
        let creds = self.store.fetch_singleton().await?;
        debug!(?creds, "Credential cache populated");
        Ok(creds)
    }
}
