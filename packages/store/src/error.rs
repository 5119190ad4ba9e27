use thiserror::Error;
use yamlstore_command::ParseError;
use yamlstore_document::{DocumentError, PathError};
use yamlstore_remote::RemoteError;

/// Why a store operation failed. Messages are safe to show to callers:
/// they never include the credential or a stored value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Missing required fields: {}", missing.join(", "))]
    ConfigIncomplete { missing: Vec<&'static str> },

    #[error("Invalid command: {0}")]
    Parse(#[from] ParseError),

    #[error("Command failed: {0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type StoreResult<T> = Result<T, StoreError>;
