//! HTTP adapter for the document tree store.
//!
//! Routes:
//!
//! - `POST /blocks/bulk-insert`: insert a batch of blocks (201)
//! - `GET /blocks?ids=1,2,3`: fetch blocks by id (200)
//! - `DELETE /blocks?ids=1,2,3`: delete blocks and their subtrees (204)
//! - `POST /blocks/{id}/duplicate`: clone a subtree (201)
//! - `POST /blocks/{id}/move`: reparent or reorder a block (204)
//! - `GET /export`: flatten the document to indented plain text (200)
//!
//! The adapter only decodes payloads and maps store errors to status codes:
//! 404 for `BlockNotFound`, 400 for `ParentNotFound`, `MoveCreatesCycle`,
//! and malformed ids, 500 for a poisoned document lock. All document
//! semantics live in [`crate::store`].
//!
//! Note for callers of the bulk-insert route: the batch is applied in order
//! and is not transactional. A 400 means some prefix of the batch was
//! committed; the response does not say how much.

pub mod views;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::{BlockId, DocumentStore, InsertOperation, StoreError};
use views::{BlockView, ErrorBody, IdListQuery, InsertRequest, MoveRequest};

/// Shared state handed to every handler.
///
/// The whole document sits behind one `RwLock`: mutations take the write
/// lock for the full operation (path resolution included), reads share the
/// read lock. Id allocation inside the store is atomic on its own.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<DocumentStore>>,
}

impl AppState {
    /// State holding a fresh, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(DocumentStore::new())),
        }
    }

    fn read_store(&self) -> Result<RwLockReadGuard<'_, DocumentStore>, Response> {
        self.store.read().map_err(|_| poisoned_lock_response())
    }

    fn write_store(&self) -> Result<RwLockWriteGuard<'_, DocumentStore>, Response> {
        self.store.write().map_err(|_| poisoned_lock_response())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/blocks/bulk-insert", post(insert_blocks))
        .route("/blocks", get(fetch_blocks).delete(delete_blocks))
        .route("/blocks/{id}/duplicate", post(duplicate_block))
        .route("/blocks/{id}/move", post(move_block))
        .route("/export", get(export_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Insert a batch of new blocks into the document.
pub(crate) async fn insert_blocks(
    State(state): State<AppState>,
    Json(request): Json<InsertRequest>,
) -> Response {
    let operations: Vec<InsertOperation> =
        request.operations.into_iter().map(Into::into).collect();

    let created = {
        let mut store = match state.write_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.insert_blocks(operations)
    };

    match created {
        Ok(blocks) => {
            let views: Vec<BlockView> = blocks.iter().map(BlockView::from_block).collect();
            (StatusCode::CREATED, Json(views)).into_response()
        }
        Err(error) => store_error_response(&error),
    }
}

/// Delete a list of existing blocks, each with its whole subtree.
pub(crate) async fn delete_blocks(
    State(state): State<AppState>,
    Query(query): Query<IdListQuery>,
) -> Response {
    let ids = match query.block_ids() {
        Ok(ids) => ids,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    {
        let mut store = match state.write_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.delete_blocks(&ids);
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Fetch a list of existing blocks by their ids.
pub(crate) async fn fetch_blocks(
    State(state): State<AppState>,
    Query(query): Query<IdListQuery>,
) -> Response {
    let ids = match query.block_ids() {
        Ok(ids) => ids,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let blocks = {
        let store = match state.read_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.fetch_blocks(&ids)
    };

    let views: Vec<BlockView> = blocks.iter().map(BlockView::from_block).collect();
    (StatusCode::OK, Json(views)).into_response()
}

/// Duplicate an existing block with its whole subtree.
pub(crate) async fn duplicate_block(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Response {
    let duplicated = {
        let mut store = match state.write_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.duplicate_block(BlockId(id))
    };

    match duplicated {
        Ok(block) => (StatusCode::CREATED, Json(BlockView::from_block(&block))).into_response(),
        Err(error) => store_error_response(&error),
    }
}

/// Move an existing block to another position in the document.
pub(crate) async fn move_block(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<MoveRequest>,
) -> Response {
    let moved = {
        let mut store = match state.write_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.move_block(BlockId(id), request.new_parent_id, request.index)
    };

    match moved {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(&error),
    }
}

/// Export the full document as indented plain text.
pub(crate) async fn export_document(State(state): State<AppState>) -> Response {
    let text = {
        let store = match state.read_store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        store.export()
    };
    text.into_response()
}

fn store_error_response(error: &StoreError) -> Response {
    let status = match error {
        StoreError::BlockNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::ParentNotFound(_) | StoreError::MoveCreatesCycle { .. } => {
            StatusCode::BAD_REQUEST
        }
    };
    tracing::debug!("rejected operation: {error}");
    error_response(status, error.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn poisoned_lock_response() -> Response {
    tracing::error!("document lock poisoned, a writer panicked mid-operation");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "document store unavailable".to_string(),
    )
}
