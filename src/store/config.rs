use anyhow::{Context, Result};

pub const DEFAULT_NAMESPACE: &str = "credentials";
pub const DEFAULT_KEY: &str = "singleton";

/// Where the credential document lives.
///
/// The object key is `{prefix}/{namespace}/{key}.json`, with the prefix
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,
    pub prefix: String,
    pub namespace: String,
    pub key: String,
}

impl StoreConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }

    /// Reads `CREDENTIALS_BUCKET` (required) and the optional
    /// `CREDENTIALS_PREFIX`, `CREDENTIALS_NAMESPACE` and `CREDENTIALS_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_bucket(None)
    }

    /// Like [`StoreConfig::from_env`], but an explicit `bucket` wins over
    /// `CREDENTIALS_BUCKET`.
    pub fn from_env_with_bucket(bucket: Option<String>) -> Result<Self> {
        let bucket = match bucket {
            Some(bucket) => bucket,
            None => {
                std::env::var("CREDENTIALS_BUCKET").context("CREDENTIALS_BUCKET must be set")?
            }
        };
        let mut config = Self::new(bucket);

        if let Ok(prefix) = std::env::var("CREDENTIALS_PREFIX") {
            config.prefix = prefix;
        }
        if let Ok(namespace) = std::env::var("CREDENTIALS_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Ok(key) = std::env::var("CREDENTIALS_KEY") {
            config.key = key;
        }

        Ok(config)
    }

    pub fn object_key(&self) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}/{}.json", self.namespace, self.key)
        } else {
            format!("{}/{}/{}.json", prefix, self.namespace, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_object_key() {
        let config = StoreConfig::new("bucket");
        assert_eq!(config.object_key(), "credentials/singleton.json");
    }

    #[test]
    fn test_object_key_with_prefix() {
        let mut config = StoreConfig::new("bucket");
        config.prefix = "/prod/app/".to_string();
        assert_eq!(config.object_key(), "prod/app/credentials/singleton.json");
    }
}
