//! HTTP API
//!
//! | Method | Path             | Body                                        |
//! |--------|------------------|---------------------------------------------|
//! | POST   | `/api/command`   | `{command, owner, repo, branch, path, token}` |
//! | POST   | `/api/check-key` | remote fields; key in `?key=` or the body   |
//! | POST   | `/api/content`   | remote fields                               |
//! | GET    | `/api/config`    | none                                        |
//!
//! Failures are reported in the body with status 200, the same way
//! successes are. Empty remote fields fall back to the server defaults.

use crate::config::{PublicConfig, ServerConfig};
use crate::logging::log_request;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use yamlstore_remote::{RemoteConfig, RemoteDocumentClient};
use yamlstore_store::{CommandResult, StoreError, StoreExecutor};

/// Key that only asks whether the file can be fetched
pub const FETCH_CONTENT_ONLY_KEY: &str = "__fetch_content_only__";

const INVALID_JSON: &str = "Invalid JSON payload";

pub struct AppState<C> {
    executor: Arc<StoreExecutor<C>>,
    config: Arc<ServerConfig>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> AppState<C> {
    fn remote_config(&self, request: &StoreRequest) -> RemoteConfig {
        self.config.remote_config(
            &request.owner,
            &request.repo,
            &request.branch,
            &request.path,
            &request.token,
        )
    }
}

/// Request body shared by the POST endpoints. Holds the token, so no `Debug`.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct StoreRequest {
    pub command: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub token: String,
    pub key: String,
}

#[derive(Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CommandResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            content: None,
        }
    }
}

impl From<CommandResult> for CommandResponse {
    fn from(result: CommandResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            content: result.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyCheckResponse {
    fn absent() -> Self {
        Self {
            exists: false,
            value_length: None,
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::absent()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

impl From<CommandResult> for ContentResponse {
    fn from(result: CommandResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            keys: result
                .keys
                .map(|keys| keys.iter().map(ToString::to_string).collect()),
        }
    }
}

pub fn router<C>(executor: StoreExecutor<C>, config: ServerConfig) -> Router
where
    C: RemoteDocumentClient + 'static,
{
    let state = AppState {
        executor: Arc::new(executor),
        config: Arc::new(config),
    };

    Router::new()
        .route("/api/command", post(handle_command::<C>))
        .route("/api/check-key", post(handle_check_key::<C>))
        .route("/api/content", post(handle_content::<C>))
        .route("/api/config", get(handle_config::<C>))
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
}

async fn handle_command<C: RemoteDocumentClient>(
    State(state): State<AppState<C>>,
    payload: Result<Json<StoreRequest>, JsonRejection>,
) -> Json<CommandResponse> {
    let Ok(Json(request)) = payload else {
        return Json(CommandResponse::failure(INVALID_JSON));
    };

    let config = state.remote_config(&request);
    let missing = config.missing_fields();
    if !missing.is_empty() {
        return Json(CommandResponse::failure(
            StoreError::ConfigIncomplete { missing }.to_string(),
        ));
    }
    if request.command.trim().is_empty() {
        return Json(CommandResponse::failure("Command is required"));
    }

    let result = state.executor.execute(&config, &request.command).await;
    Json(result.into())
}

async fn handle_check_key<C: RemoteDocumentClient>(
    State(state): State<AppState<C>>,
    query: Option<Query<KeyQuery>>,
    payload: Result<Json<StoreRequest>, JsonRejection>,
) -> Json<KeyCheckResponse> {
    let Ok(Json(request)) = payload else {
        return Json(KeyCheckResponse::error(INVALID_JSON));
    };

    let config = state.remote_config(&request);
    let missing = config.missing_fields();
    if !missing.is_empty() {
        return Json(KeyCheckResponse::error(
            StoreError::ConfigIncomplete { missing }.to_string(),
        ));
    }

    // Query parameter wins over the body
    let key = query
        .and_then(|Query(query)| query.key)
        .filter(|key| !key.trim().is_empty())
        .unwrap_or(request.key);
    let key = key.trim();
    if key.is_empty() {
        return Json(KeyCheckResponse::error("Key parameter is required"));
    }

    if key == FETCH_CONTENT_ONLY_KEY {
        return Json(match state.executor.probe(&config).await {
            Ok(_) => KeyCheckResponse::absent(),
            Err(err) => KeyCheckResponse::error(err.to_string()),
        });
    }

    Json(match state.executor.check_key(&config, key).await {
        Ok(check) => KeyCheckResponse {
            exists: check.exists,
            value_length: check.value_length,
            error: None,
        },
        Err(err) => KeyCheckResponse::error(err.to_string()),
    })
}

async fn handle_content<C: RemoteDocumentClient>(
    State(state): State<AppState<C>>,
    payload: Result<Json<StoreRequest>, JsonRejection>,
) -> Json<ContentResponse> {
    let Ok(Json(request)) = payload else {
        return Json(ContentResponse::from(CommandResult::failure(INVALID_JSON)));
    };

    let config = state.remote_config(&request);
    Json(state.executor.list_keys(&config).await.into())
}

async fn handle_config<C: RemoteDocumentClient>(
    State(state): State<AppState<C>>,
) -> Json<PublicConfig> {
    Json(state.config.public())
}
