use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CredentialCache;
use crate::context::RequestContext;
use crate::fetch::client::HttpClient;
use crate::store::CredentialStore;

/// An [`HttpClient`] wrapper that sends the cached access token as
/// `Authorization: Bearer <token>`.
///
/// The token is read from the shared [`CredentialCache`] on every request, so
/// the first request on a cold cache pays for the store lookup.
pub struct CachedBearer<C, S> {
    pub inner: C,
    pub cache: Arc<CredentialCache<S>>,
    /// Upper bound on a cold-start credential fetch per request.
    pub fetch_timeout: Option<Duration>,
}

impl<C, S> CachedBearer<C, S> {
    pub fn new(inner: C, cache: Arc<CredentialCache<S>>) -> Self {
        Self {
            inner,
            cache,
            fetch_timeout: None,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<C: HttpClient, S: CredentialStore> HttpClient for CachedBearer<C, S> {
    async fn execute(&self, mut req: reqwest::Request) -> anyhow::Result<reqwest::Response> {
        let ctx = match self.fetch_timeout {
            Some(timeout) => RequestContext::with_timeout(timeout),
            None => RequestContext::background(),
        };
        let token = self
            .cache
            .access_token(&ctx)
            .await
            .context("loading access token")?;

        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("access token is not a valid header value")?;
        value.set_sensitive(true);
        req.headers_mut().insert(AUTHORIZATION, value);

        self.inner.execute(req).await
    }
}
