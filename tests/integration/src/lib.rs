//! End-to-end tests for dynaquery.
//!
//! Requests run through a [`RecordingClient`] that records every compiled
//! request body and replays canned responses in order, so the whole path
//! from fluent call to decoded result is exercised without a store.
//!
//! Run them with:
//! ```text
//! cargo test -p dynaquery-integration
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Once};

use dynaquery_core::client::{StoreClient, StoreFuture, StoreResponse};
use dynaquery_core::{Connection, QueryConfig};
use dynaquery_model::error::{StoreError, StoreErrorCode};
use dynaquery_model::{Operation, RequestParams};
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// One request as the store received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Wire operation.
    pub operation: Operation,
    /// JSON request body.
    pub body: serde_json::Value,
}

#[derive(Debug)]
enum Canned {
    Response(StoreResponse),
    Error(http::StatusCode, serde_json::Value),
}

#[derive(Debug, Default)]
struct Recorder {
    responses: Mutex<VecDeque<Canned>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Store client recording requests and replaying queued responses.
///
/// With the queue exhausted every call answers `{}`.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    inner: Arc<Recorder>,
}

impl RecordingClient {
    /// A client with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200 OK` response with `body`.
    #[must_use]
    pub fn respond(self, body: serde_json::Value) -> Self {
        self.inner
            .responses
            .lock()
            .push_back(Canned::Response(StoreResponse::ok(body)));
        self
    }

    /// Queue a store error, sent as the JSON error body DynamoDB returns.
    #[must_use]
    pub fn fail(self, code: StoreErrorCode, message: impl Into<String>) -> Self {
        let body = serde_json::json!({
            "__type": format!("com.amazonaws.dynamodb.v20120810#{code}"),
            "message": message.into(),
        });
        self.fail_with(code.default_status_code(), body)
    }

    /// Queue a raw error response.
    #[must_use]
    pub fn fail_with(self, status: http::StatusCode, body: serde_json::Value) -> Self {
        self.inner
            .responses
            .lock()
            .push_back(Canned::Error(status, body));
        self
    }

    /// Every request received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().clone()
    }

    /// A connection sending through this client.
    #[must_use]
    pub fn connection(&self) -> Connection {
        self.connection_with(QueryConfig::default())
    }

    /// A connection with `config` sending through this client.
    #[must_use]
    pub fn connection_with(&self, config: QueryConfig) -> Connection {
        init_tracing();
        Connection::new(self.clone()).with_config(config)
    }
}

impl StoreClient for RecordingClient {
    fn call(&self, operation: Operation, params: RequestParams) -> StoreFuture {
        let body = params.to_json().unwrap_or(serde_json::Value::Null);
        tracing::debug!(operation = %operation, "recording store call");
        self.inner.calls.lock().push(RecordedCall { operation, body });

        let canned = self.inner.responses.lock().pop_front();
        Box::pin(async move {
            match canned {
                Some(Canned::Response(response)) => Ok(response),
                Some(Canned::Error(status, body)) => Err(StoreError::from_body(status, &body)),
                None => Ok(StoreResponse::ok(serde_json::json!({}))),
            }
        })
    }
}

mod test_batch;
mod test_error;
mod test_pagination;
mod test_query;
mod test_roundtrip;
mod test_update;
