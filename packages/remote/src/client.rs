use crate::RemoteConfig;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Opaque version token of a remote file. Only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File content as observed at `revision`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub content: String,
    pub revision: Revision,
}

/// Errors never contain the credential
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote file not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: the remote rejected the credential")]
    Unauthorized,

    #[error("Conflict: the remote file changed since it was fetched")]
    Conflict,

    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response from remote: {0}")]
    Protocol(String),
}

impl RemoteError {
    /// Worth retrying after a backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Unavailable(_))
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait RemoteDocumentClient: Send + Sync {
    /// Short name for logs
    fn backend_tag(&self) -> &'static str;

    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument>;

    /// Replace the file if it is still at `revision`; returns the new revision
    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        message: &str,
    ) -> RemoteResult<Revision>;
}
