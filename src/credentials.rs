//! The singleton credential record.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CredentialError;

/// The shared HMAC key and outbound access token.
///
/// Stored as a JSON document:
/// ```json
/// { "secret_key": "3q2+7w==", "access_token": "tok-123" }
/// ```
/// `secret_key` is standard base64. Missing fields read back as empty values,
/// and empty values are accepted as-is.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, with = "base64_bytes")]
    pub secret_key: Bytes,
    #[serde(default)]
    pub access_token: String,
}

impl Credentials {
    pub fn new(secret_key: impl Into<Bytes>, access_token: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            access_token: access_token.into(),
        }
    }

    /// Parses a stored JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(CredentialError::decode)
    }

    /// Renders the stored JSON document.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_key", &format_args!("<{} bytes>", self.secret_key.len()))
            .field("access_token", &format_args!("<{} chars>", self.access_token.len()))
            .finish()
    }
}

mod base64_bytes {
    use base64::prelude::*;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
