//! Outbound HTTP with credentials pulled from the cache.

mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Result, bail};

/// Issues a GET and returns the body, failing on a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("<body unreadable: {e}>"));
        bail!("GET {url} returned status {status}: {body}");
    }

    Ok(resp.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Answers every request with a fixed status and body.
    struct Canned(u16, &'static str);

    #[async_trait]
    impl HttpClient for Canned {
        async fn execute(&self, _req: reqwest::Request) -> Result<reqwest::Response> {
            let resp = http::Response::builder().status(self.0).body(self.1)?;
            Ok(reqwest::Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let body = fetch_bytes(&Canned(200, "hello"), "https://example.com/").await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_error_status_keeps_body_in_message() {
        let err = fetch_bytes(&Canned(401, "bad credentials"), "https://example.com/")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"), "{message}");
        assert!(message.contains("bad credentials"), "{message}");
    }
}
