//! # GitHub Contents API Client
//!
//! Reads and writes one file through `GET`/`PUT
//! /repos/{owner}/{repo}/contents/{path}`. The blob `sha` returned by the
//! API is the revision token; GitHub rejects a `PUT` whose `sha` is stale,
//! which is what turns concurrent writers into [`RemoteError::Conflict`].

use crate::{RemoteConfig, RemoteDocument, RemoteDocumentClient, RemoteError, RemoteResult, Revision};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// API root, e.g. `https://api.github.com` or a GitHub Enterprise URL
    pub api_url: String,
    /// Upper bound for each request, connect through body
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("yamlstore/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
}

#[derive(Deserialize)]
struct ContentsResponse {
    #[serde(rename = "type")]
    kind: Option<String>,
    sha: String,
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Deserialize)]
struct UpdateResponse {
    content: Option<ContentRef>,
}

#[derive(Deserialize)]
struct ContentRef {
    sha: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GithubClient {
    pub fn new(config: GithubClientConfig) -> RemoteResult<Self> {
        let api_url = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| RemoteError::Protocol(format!("invalid api url: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(RemoteError::Protocol(format!(
                "api url cannot be a base: {api_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| RemoteError::Protocol(format!("failed to build http client: {e}")))?;

        Ok(Self { http, api_url })
    }

    fn contents_url(&self, config: &RemoteConfig) -> RemoteResult<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::Protocol("api url cannot be a base".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["repos", config.owner.as_str(), config.repo.as_str(), "contents"])
                .extend(config.path.split('/').filter(|part| !part.is_empty()));
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, config: &RemoteConfig) -> RequestBuilder {
        request
            .bearer_auth(config.token.expose())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[async_trait]
impl RemoteDocumentClient for GithubClient {
    fn backend_tag(&self) -> &'static str {
        "github"
    }

    #[instrument(name = "github_fetch", skip(self, config), fields(location = %config.location()))]
    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument> {
        let mut url = self.contents_url(config)?;
        url.query_pairs_mut().append_pair("ref", &config.branch);

        let response = self
            .authorized(self.http.get(url), config)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response, config).await);
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("invalid contents response: {e}")))?;
        if let Some(kind) = body.kind.as_deref() {
            if kind != "file" {
                return Err(RemoteError::Protocol(format!(
                    "{} is a {kind}, not a file",
                    config.path
                )));
            }
        }

        let content = decode_content(body.content.as_deref(), body.encoding.as_deref())?;
        tracing::debug!(revision = %body.sha, bytes = content.len(), "fetched remote file");

        Ok(RemoteDocument {
            content,
            revision: Revision::new(body.sha),
        })
    }

    #[instrument(
        name = "github_commit",
        skip(self, config, content, revision, message),
        fields(location = %config.location(), base = %revision)
    )]
    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        message: &str,
    ) -> RemoteResult<Revision> {
        let url = self.contents_url(config)?;
        let request = UpdateRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha: revision.as_str(),
            branch: &config.branch,
        };

        let response = self
            .authorized(self.http.put(url), config)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response, config).await);
        }

        let body: UpdateResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("invalid update response: {e}")))?;
        let sha = body
            .content
            .map(|c| c.sha)
            .ok_or_else(|| RemoteError::Protocol("update response has no content sha".to_string()))?;

        tracing::debug!(revision = %sha, "committed remote file");
        Ok(Revision::new(sha))
    }
}

fn decode_content(content: Option<&str>, encoding: Option<&str>) -> RemoteResult<String> {
    match encoding {
        Some("base64") | None => {
            // The API wraps base64 at 60 columns
            let packed: String = content
                .unwrap_or_default()
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD
                .decode(packed)
                .map_err(|e| RemoteError::Protocol(format!("invalid base64 content: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|_| RemoteError::Protocol("file is not valid UTF-8".to_string()))
        }
        Some("none") => Err(RemoteError::Protocol(
            "file is too large for the contents API".to_string(),
        )),
        Some(other) => Err(RemoteError::Protocol(format!(
            "unsupported content encoding '{other}'"
        ))),
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Unavailable("request timed out".to_string())
    } else if err.is_connect() {
        RemoteError::Unavailable(format!("connection failed: {}", err.without_url()))
    } else {
        RemoteError::Unavailable(err.without_url().to_string())
    }
}

async fn status_error(response: Response, config: &RemoteConfig) -> RemoteError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized,
        StatusCode::FORBIDDEN if message.to_ascii_lowercase().contains("rate limit") => {
            RemoteError::Unavailable(format!("rate limited: {message}"))
        }
        StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        StatusCode::NOT_FOUND => RemoteError::NotFound(config.location()),
        // Stale or mismatched sha on update
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => RemoteError::Conflict,
        StatusCode::TOO_MANY_REQUESTS => RemoteError::Unavailable(format!("status {status}")),
        s if s.is_server_error() => RemoteError::Unavailable(format!("status {status}")),
        _ => RemoteError::Protocol(format!("status {status}: {message}")),
    }
}
