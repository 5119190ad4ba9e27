//! # YAML Store Executor
//!
//! Ties commands, documents and the remote together:
//!
//! ```text
//! validate config → fetch (retry) → parse command → apply → serialize
//!                      ↑                                        ↓
//!                      └──── re-fetch once on Conflict ◀──── commit (retry)
//! ```
//!
//! Read-only commands (`get`, `keys`) stop after `apply` and never commit.
//! An executor holds no document state and can be shared between requests.
//!
//! ```rust,no_run
//! use yamlstore_remote::{MemoryRemote, RemoteConfig};
//! use yamlstore_store::StoreExecutor;
//!
//! # async fn demo() {
//! let remote = MemoryRemote::new();
//! let config = RemoteConfig::new("acme", "infra", "main", "config.yaml", "token");
//! remote.put_file(&config, "{}\n");
//!
//! let executor = StoreExecutor::new(remote);
//! let result = executor.execute(&config, "set app.name=Demo").await;
//! assert!(result.success);
//! # }
//! ```

mod error;
mod executor;
mod result;
mod retry;

pub use error::{StoreError, StoreResult};
pub use executor::StoreExecutor;
pub use result::CommandResult;
pub use retry::RetryPolicy;
