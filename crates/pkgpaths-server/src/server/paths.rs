//! Partial-path endpoints.
//!
//! Request paths mirror the query kind: `/imports/{PATH}` and `/dirs/{PATH}`.
//! Anything else is treated as a directory query with the leading `/`
//! removed once, so `/net/http` behaves like `/dirs/net/http`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::Json;

use pkgpaths::{IndexStatus, QueryKind};

use super::error::ApiError;
use super::ServerState;

/// GET /imports/{PATH}
pub(crate) async fn imports(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Result<String, ApiError> {
    run_query(&state, path, QueryKind::Imports).await
}

/// GET /dirs/{PATH}
pub(crate) async fn dirs(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Result<String, ApiError> {
    run_query(&state, path, QueryKind::Dirs).await
}

/// Every path not claimed by another route, including bare `/imports/` and
/// `/dirs/`.
pub(crate) async fn fallback(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
) -> Result<String, ApiError> {
    let decoded = urlencoding::decode(uri.path())
        .map_err(|_| ApiError::bad_request("request path is not valid UTF-8"))?;
    let (query, kind) = split_request_path(&decoded);
    run_query(&state, query.to_string(), kind).await
}

/// GET /update
///
/// Rebuilds the index and returns once the new snapshot is in place.
pub(crate) async fn update(State(state): State<Arc<ServerState>>) -> Result<String, ApiError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.rebuild()).await?;
    Ok(String::new())
}

/// GET /status
pub(crate) async fn status(State(state): State<Arc<ServerState>>) -> Json<IndexStatus> {
    Json(state.store.status())
}

/// Splits a decoded request path into query text and kind.
pub(crate) fn split_request_path(path: &str) -> (&str, QueryKind) {
    if let Some(rest) = path.strip_prefix("/imports/") {
        (rest, QueryKind::Imports)
    } else if let Some(rest) = path.strip_prefix("/dirs/") {
        (rest, QueryKind::Dirs)
    } else {
        (path.strip_prefix('/').unwrap_or(path), QueryKind::Dirs)
    }
}

async fn run_query(
    state: &ServerState,
    query: String,
    kind: QueryKind,
) -> Result<String, ApiError> {
    log::debug!("{} query {query:?}", kind.as_str());
    let store = state.store.clone();
    let results = tokio::task::spawn_blocking(move || store.query(&query, kind)).await?;
    Ok(render_lines(&results))
}

/// One result per line, always newline terminated.
fn render_lines(results: &[String]) -> String {
    let mut body = results.join("\n");
    body.push('\n');
    body
}
