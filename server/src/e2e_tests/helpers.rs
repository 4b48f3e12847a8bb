//! Common helpers for end-to-end tests.

use axum::Json;
use axum::body::to_bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::api::views::{
    BlockView, ErrorBody, IdListQuery, InsertOperationRequest, InsertRequest, MoveRequest,
};
use crate::api::{self, AppState};
use crate::store::BlockId;

/// Drives the HTTP handlers against a document, one runtime per client.
pub struct TestClient {
    state: AppState,
    runtime: tokio::runtime::Runtime,
}

impl TestClient {
    /// Create a client with a fresh, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::new())
    }

    fn with_state(state: AppState) -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
        Self { state, runtime }
    }

    /// Create a client that shares this client's document, as a second
    /// connection to the same server would.
    #[must_use]
    pub fn sibling(&self) -> Self {
        Self::with_state(self.state.clone())
    }

    /// The shared state, for tests that call a handler directly.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// `POST /blocks/bulk-insert`
    pub fn insert(&self, operations: Vec<InsertOperationRequest>) -> Response {
        self.runtime.block_on(api::insert_blocks(
            State(self.state.clone()),
            Json(InsertRequest { operations }),
        ))
    }

    /// `POST /blocks/bulk-insert`, asserting the batch is created.
    pub fn insert_ok(&self, operations: Vec<InsertOperationRequest>) -> Vec<BlockView> {
        let response = self.insert(operations);
        assert_eq!(response.status(), StatusCode::CREATED);
        self.json(response)
    }

    /// `GET /blocks?ids=...`
    pub fn fetch(&self, ids: &str) -> Response {
        self.runtime.block_on(api::fetch_blocks(
            State(self.state.clone()),
            Query(IdListQuery {
                ids: ids.to_string(),
            }),
        ))
    }

    /// `GET /blocks?ids=...`, asserting success.
    pub fn fetch_ok(&self, ids: &str) -> Vec<BlockView> {
        let response = self.fetch(ids);
        assert_eq!(response.status(), StatusCode::OK);
        self.json(response)
    }

    /// `DELETE /blocks?ids=...`
    pub fn delete(&self, ids: &str) -> Response {
        self.runtime.block_on(api::delete_blocks(
            State(self.state.clone()),
            Query(IdListQuery {
                ids: ids.to_string(),
            }),
        ))
    }

    /// `POST /blocks/{id}/duplicate`
    pub fn duplicate(&self, id: u64) -> Response {
        self.runtime
            .block_on(api::duplicate_block(State(self.state.clone()), Path(id)))
    }

    /// `POST /blocks/{id}/move`
    pub fn move_block(&self, id: u64, new_parent_id: u64, index: usize) -> Response {
        self.runtime.block_on(api::move_block(
            State(self.state.clone()),
            Path(id),
            Json(MoveRequest {
                new_parent_id: BlockId(new_parent_id),
                index,
            }),
        ))
    }

    /// `GET /export`, asserting success.
    pub fn export(&self) -> String {
        let response = self
            .runtime
            .block_on(api::export_document(State(self.state.clone())));
        assert_eq!(response.status(), StatusCode::OK);
        self.body_string(response)
    }

    /// Decode a JSON response body.
    pub fn json<T: serde::de::DeserializeOwned>(&self, response: Response) -> T {
        let bytes = self.runtime.block_on(async {
            to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body should be readable")
        });
        serde_json::from_slice(&bytes).expect("body should decode")
    }

    /// Read a response body as UTF-8 text.
    pub fn body_string(&self, response: Response) -> String {
        let bytes = self.runtime.block_on(async {
            to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body should be readable")
        });
        String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
    }

    /// The message carried by a non-2xx error body.
    pub fn error_message(&self, response: Response) -> String {
        let body: ErrorBody = self.json(response);
        body.error
    }
}

/// Shorthand for one bulk-insert operation.
#[must_use]
pub fn op(parent_id: u64, index: usize, content: &str) -> InsertOperationRequest {
    InsertOperationRequest {
        parent_id: BlockId(parent_id),
        index,
        content: content.to_string(),
    }
}
