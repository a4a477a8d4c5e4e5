//! Failure kinds surfaced by credential loading.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why the credential record could not be produced.
///
/// Returned verbatim from the cache accessors; nothing is retried or
/// replaced with a default.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The singleton record does not exist in the store.
    #[error("credential record '{0}' not found")]
    NotFound(String),

    /// The store could not be reached, or the caller's deadline elapsed.
    #[error("credential store request failed")]
    Transport(#[source] BoxError),

    /// The stored document does not have the expected shape.
    #[error("credential record could not be decoded")]
    Decode(#[source] BoxError),
}

impl CredentialError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    pub fn decode(err: impl Into<BoxError>) -> Self {
        Self::Decode(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
