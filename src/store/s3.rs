use anyhow::Context;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use super::{CredentialStore, StoreConfig};
use crate::credentials::Credentials;
use crate::error::CredentialError;

/// Reads the credential document from an S3 object.
///
/// The process needs `s3:GetObject` on the configured key, plus
/// `s3:PutObject` if [`S3CredentialStore::put_singleton`] is used.
///
/// `s3:ListBucket` on the bucket is also required for a missing record to
/// surface as [`CredentialError::NotFound`]. Without it S3 answers a missing
/// key with 403 `AccessDenied`, which is reported as
/// [`CredentialError::Transport`].
pub struct S3CredentialStore {
    client: aws_sdk_s3::Client,
    config: StoreConfig,
}

impl S3CredentialStore {
    /// Creates a store using the ambient AWS configuration (env vars, instance
    /// profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: StoreConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            config,
        }
    }

    /// Creates a store around an already configured S3 client.
    pub fn from_client(client: aws_sdk_s3::Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Writes `creds` as the singleton document, replacing any existing one.
    pub async fn put_singleton(&self, creds: &Credentials) -> anyhow::Result<()> {
        let body = creds.to_json().context("serializing credential record")?;

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(self.config.object_key())
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .with_context(|| {
                format!(
                    "S3 PutObject failed for '{}/{}'",
                    self.config.bucket,
                    self.config.object_key()
                )
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for S3CredentialStore {
    async fn fetch_singleton(&self) -> Result<Credentials, CredentialError> {
        let key = self.config.object_key();
        debug!(bucket = %self.config.bucket, key = %key, "GetObject credential record");

        let resp = match self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key());
                return Err(if missing {
                    CredentialError::NotFound(key)
                } else {
                    CredentialError::transport(err)
                });
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .map_err(CredentialError::transport)?
            .into_bytes();

        Credentials::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials as AwsCredentials, Region};
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    const OBJECT_URL: &str = "https://creds-bucket.s3.us-east-1.amazonaws.com/credentials/singleton.json";

    /// Builds a store whose single GetObject call is answered with `status` and `body`.
    fn replaying(status: u16, body: impl Into<String>) -> (S3CredentialStore, StaticReplayClient) {
        let http_client = StaticReplayClient::new(vec![ReplayEvent::new(
            http::Request::builder()
                .method("GET")
                .uri(OBJECT_URL)
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(status)
                .body(SdkBody::from(body.into()))
                .unwrap(),
        )]);

        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(AwsCredentials::new("akid", "secret", None, None, "test"))
            .retry_config(RetryConfig::disabled())
            .http_client(http_client.clone())
            .build();

        let store = S3CredentialStore::from_client(
            aws_sdk_s3::Client::from_conf(conf),
            StoreConfig::new("creds-bucket"),
        );
        (store, http_client)
    }

    fn s3_error(code: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>{code}</Code><Message>{code}</Message>\
             <RequestId>req-1</RequestId><HostId>host-1</HostId></Error>"
        )
    }

    #[tokio::test]
    async fn test_no_such_key_is_not_found() {
        let (store, http_client) = replaying(404, s3_error("NoSuchKey"));

        let err = store.fetch_singleton().await.unwrap_err();
        assert!(
            matches!(&err, CredentialError::NotFound(key) if key == "credentials/singleton.json"),
            "unexpected error: {err:?}"
        );
        assert_eq!(http_client.actual_requests().count(), 1);
    }

    #[tokio::test]
    async fn test_access_denied_is_transport() {
        let (store, _http_client) = replaying(403, s3_error("AccessDenied"));

        let err = store.fetch_singleton().await.unwrap_err();
        assert!(matches!(err, CredentialError::Transport(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let (store, _http_client) = replaying(500, s3_error("InternalError"));

        let err = store.fetch_singleton().await.unwrap_err();
        assert!(matches!(err, CredentialError::Transport(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_malformed_document_is_decode_error() {
        let (store, _http_client) = replaying(200, "not json at all");

        let err = store.fetch_singleton().await.unwrap_err();
        assert!(matches!(err, CredentialError::Decode(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_empty_document_reads_as_empty_fields() {
        let (store, _http_client) = replaying(200, "{}");

        let creds = store.fetch_singleton().await.unwrap();
        assert_eq!(creds, Credentials::default());
    }

    #[tokio::test]
    async fn test_full_document_is_decoded() {
        let (store, _http_client) =
            replaying(200, r#"{"secret_key":"3q2+7w==","access_token":"tok-123"}"#);

        let creds = store.fetch_singleton().await.unwrap();
        assert_eq!(&creds.secret_key[..], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(creds.access_token, "tok-123");
    }
}
