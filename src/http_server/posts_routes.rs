//! Posts HTTP Routes
//!
//! CRUD endpoints over the post store. Handlers validate input shape, run
//! the store call on the blocking pool, and map store errors to statuses.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::store::{NewPost, Post, PostStore, StoreError, StoreResult};

// ==================
// Shared State
// ==================

/// Posts state shared across handlers
pub struct PostsState {
    pub store: Arc<dyn PostStore>,
    pub metrics: Arc<MetricsRegistry>,
}

impl PostsState {
    pub fn new(store: Arc<dyn PostStore>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { store, metrics }
    }
}

// ==================
// Request/Response Types
// ==================

/// Body of create requests
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
}

impl PostRequest {
    /// Both fields must be non-empty
    fn validate(self) -> Result<NewPost, ApiError> {
        if self.title.is_empty() || self.body.is_empty() {
            return Err(ApiError::InvalidRequest);
        }
        Ok(NewPost::new(self.title, self.body))
    }
}

/// Body of update requests; absent fields replace content with ""
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: String,
    pub body: String,
}

impl From<UpdatePostRequest> for NewPost {
    fn from(request: UpdatePostRequest) -> Self {
        NewPost::new(request.title, request.body)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsListResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Error returned by posts handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    InvalidRequest,

    #[error("Invalid post ID")]
    InvalidId,

    #[error("Post not found")]
    NotFound,

    /// Store failure; the message names the operation, not the cause
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

// ==================
// Posts Routes
// ==================

/// Create posts routes
pub fn posts_routes(state: Arc<PostsState>) -> Router {
    Router::new()
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route(
            "/posts/:id",
            get(get_post_handler)
                .put(update_post_handler)
                .delete(delete_post_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Negative integers are well-formed but can never name a post
fn parse_id(id: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let Path(raw) = id.map_err(|_| ApiError::InvalidId)?;
    match raw.parse::<u64>() {
        Ok(id) => Ok(id),
        Err(_) if raw.parse::<i64>().is_ok() => Err(ApiError::NotFound),
        Err(_) => Err(ApiError::InvalidId),
    }
}

fn parse_body(payload: Result<Json<PostRequest>, JsonRejection>) -> Result<NewPost, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::InvalidRequest)?;
    request.validate()
}

/// Run a store operation on the blocking pool.
///
/// Not-found becomes 404; any other failure is logged, counted, and
/// reported as 500 with `failure` as the message.
async fn call_store<T, F>(state: &PostsState, failure: &'static str, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn PostStore) -> StoreResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(store.as_ref())).await;

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) if err.is_not_found() => Err(ApiError::NotFound),
        Ok(Err(err)) => {
            state.metrics.increment_store_errors();
            log_store_error(&err, failure);
            Err(ApiError::Internal(failure))
        }
        Err(join_err) => {
            Logger::error(
                Event::RequestFailed.as_str(),
                &[("reason", failure), ("error", &join_err.to_string())],
            );
            Err(ApiError::Internal(failure))
        }
    }
}

fn log_store_error(err: &StoreError, failure: &str) {
    Logger::error(
        Event::StoreError.as_str(),
        &[
            ("code", err.code().code()),
            ("error", &err.to_string()),
            ("reason", failure),
        ],
    );
}

// ==================
// Handlers
// ==================

async fn create_post_handler(
    State(state): State<Arc<PostsState>>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let new_post = parse_body(payload)?;

    let post = call_store(&state, "Failed to create post", move |store| {
        store.create(new_post)
    })
    .await?;

    state.metrics.increment_posts_created();
    log_event_with_fields(Event::PostCreated, &[("id", &post.id.to_string())]);

    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

async fn list_posts_handler(
    State(state): State<Arc<PostsState>>,
) -> Result<Json<PostsListResponse>, ApiError> {
    let posts = call_store(&state, "Failed to fetch posts", |store| store.get_all()).await?;
    Ok(Json(PostsListResponse { posts }))
}

async fn get_post_handler(
    State(state): State<Arc<PostsState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_id(id)?;
    let post = call_store(&state, "Failed to fetch post", move |store| store.get_by_id(id)).await?;
    Ok(Json(PostResponse { post }))
}

async fn update_post_handler(
    State(state): State<Arc<PostsState>>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_id(id)?;

    // An unknown id is reported before the body is looked at
    call_store(&state, "Failed to update post", move |store| store.get_by_id(id)).await?;

    let Json(request) = payload.map_err(|_| ApiError::InvalidRequest)?;
    let content = NewPost::from(request);

    let post = call_store(&state, "Failed to update post", move |store| {
        let mut post = store.get_by_id(id)?;
        post.set_content(content);
        store.update(post)
    })
    .await?;

    state.metrics.increment_posts_updated();
    log_event_with_fields(Event::PostUpdated, &[("id", &post.id.to_string())]);

    Ok(Json(PostResponse { post }))
}

async fn delete_post_handler(
    State(state): State<Arc<PostsState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;

    call_store(&state, "Failed to delete post", move |store| store.delete(id)).await?;

    state.metrics.increment_posts_deleted();
    log_event_with_fields(Event::PostDeleted, &[("id", &id.to_string())]);

    Ok(StatusCode::NO_CONTENT)
}
