//! Server configuration from flags and environment variables

use clap::Parser;
use serde::Serialize;
use std::convert::Infallible;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use yamlstore_remote::{Credential, GithubClientConfig, RemoteConfig, DEFAULT_API_URL};
use yamlstore_store::RetryPolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "yamlstore-server")]
#[command(author, version, about = "Key-path editing of YAML files stored in a GitHub repository", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 8082)]
    pub port: u16,

    /// Repository owner used when a request leaves it empty
    #[arg(long, env = "REPO_OWNER", default_value = "")]
    pub repo_owner: String,

    /// Repository name used when a request leaves it empty
    #[arg(long, env = "REPO_NAME", default_value = "")]
    pub repo_name: String,

    #[arg(long, env = "BRANCH", default_value = "main")]
    pub branch: String,

    /// Token used when a request carries none
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        value_parser = parse_credential
    )]
    pub github_token: Credential,

    /// Files offered to clients, comma separated
    #[arg(
        long,
        env = "FILE_PATHS",
        value_delimiter = ',',
        default_value = "config.yaml,config/app.yaml,deploy/values.yaml"
    )]
    pub file_paths: Vec<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Per-request timeout towards the remote, in seconds
    #[arg(long, env = "REMOTE_TIMEOUT_SECS", default_value_t = 15)]
    pub remote_timeout_secs: u64,

    /// Attempts per remote call when the remote is unavailable
    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = 3)]
    pub retry_attempts: usize,

    /// Serve from an in-process remote instead of GitHub
    #[arg(long)]
    pub memory: bool,
}

/// Load variables from a `.env` file, `./.env` or a parent's when `path` is
/// `None`. Variables already set in the process win. A missing file only
/// logs a warning.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => {
            info!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => {
            warn!("No .env file found, using the process environment");
            None
        }
        Err(e) => {
            warn!("Failed to load .env file: {}", e);
            None
        }
    }
}

fn parse_credential(value: &str) -> Result<Credential, Infallible> {
    Ok(Credential::new(value.trim()))
}

/// What `GET /api/config` exposes. No credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub file_paths: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8082,
            repo_owner: String::new(),
            repo_name: String::new(),
            branch: "main".to_string(),
            github_token: Credential::default(),
            file_paths: vec![
                "config.yaml".to_string(),
                "config/app.yaml".to_string(),
                "deploy/values.yaml".to_string(),
            ],
            github_api_url: DEFAULT_API_URL.to_string(),
            remote_timeout_secs: 15,
            retry_attempts: 3,
            memory: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote-timeout-secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry-attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.file_paths().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file-paths",
                reason: "no file path given".to_string(),
            });
        }
        Ok(())
    }

    /// Configured file paths, trimmed, empties dropped
    pub fn file_paths(&self) -> Vec<String> {
        self.file_paths
            .iter()
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Fill the empty fields of a request with the server defaults. The path
    /// has no default.
    pub fn remote_config(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
        token: &str,
    ) -> RemoteConfig {
        fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
            if value.trim().is_empty() {
                fallback
            } else {
                value.trim()
            }
        }

        RemoteConfig::new(
            or(owner, &self.repo_owner),
            or(repo, &self.repo_name),
            or(branch, &self.branch),
            path.trim(),
            or(token, self.github_token.expose()),
        )
    }

    pub fn public(&self) -> PublicConfig {
        PublicConfig {
            repo_owner: self.repo_owner.clone(),
            repo_name: self.repo_name.clone(),
            branch: self.branch.clone(),
            file_paths: self.file_paths(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            ..RetryPolicy::default()
        }
    }

    pub fn github_client_config(&self) -> GithubClientConfig {
        GithubClientConfig {
            api_url: self.github_api_url.clone(),
            timeout: Duration::from_secs(self.remote_timeout_secs),
            ..GithubClientConfig::default()
        }
    }

    pub fn log_summary(&self) {
        info!("Server configuration loaded:");
        info!("  Repository Owner: {}", or_not_set(&self.repo_owner));
        info!("  Repository Name: {}", or_not_set(&self.repo_name));
        info!("  Branch: {}", self.branch);
        info!(
            "  GitHub Token: {}",
            if self.github_token.is_empty() { "<not set>" } else { "****" }
        );
        info!("  File Paths: {:?}", self.file_paths());
        info!("  GitHub API: {}", self.github_api_url);
        info!("  Port: {}", self.port);
        if self.memory {
            info!("  Remote: in-memory");
        }
    }
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "<not set>"
    } else {
        value
    }
}
