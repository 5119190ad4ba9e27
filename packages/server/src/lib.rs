//! # YAML Store Server
//!
//! axum front end for [`yamlstore_store::StoreExecutor`]. The binary in
//! `src/bin/server.rs` wires it to GitHub, or to an in-memory remote with
//! `--memory`.

pub mod api;
pub mod config;
mod logging;

pub use api::{router, CommandResponse, ContentResponse, KeyCheckResponse, FETCH_CONTENT_ONLY_KEY};
pub use config::{load_env_file, ConfigError, PublicConfig, ServerConfig};
