//! # YAML Store Remote
//!
//! Access to the single file a store operates on, held in a remote
//! repository host.
//!
//! ## Contract
//!
//! - `fetch` returns the file's text and the [`Revision`] it was read at.
//! - `commit` replaces the file only if the host's current revision still
//!   equals the given one, otherwise it fails with [`RemoteError::Conflict`].
//!   A successful commit creates exactly one revision; a failed one creates
//!   none.
//! - Clients never retry. Callers decide what to do with
//!   [`RemoteError::Unavailable`] and [`RemoteError::Conflict`].
//!
//! ## Implementations
//!
//! - [`GithubClient`]: GitHub REST contents API
//! - [`MemoryRemote`]: in-process host for tests and local development

mod client;
mod config;
mod github;
mod memory;

pub use client::{RemoteDocument, RemoteDocumentClient, RemoteError, RemoteResult, Revision};
pub use config::{Credential, RemoteConfig};
pub use github::{GithubClient, GithubClientConfig, DEFAULT_API_URL};
pub use memory::MemoryRemote;
