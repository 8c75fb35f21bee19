//! Store client trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use dynaquery_model::error::StoreError;
use dynaquery_model::operations::Operation;
use dynaquery_model::params::RequestParams;

/// Raw response of one store call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    /// HTTP status of the call.
    pub status: http::StatusCode,
    /// JSON body as returned by the store.
    pub body: serde_json::Value,
}

impl StoreResponse {
    /// A `200 OK` response with `body`.
    #[must_use]
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: http::StatusCode::OK,
            body,
        }
    }
}

/// Future returned by [`StoreClient`] calls.
pub type StoreFuture = Pin<Box<dyn Future<Output = Result<StoreResponse, StoreError>> + Send>>;

/// Trait the transport to the store must implement.
///
/// The client receives a wire operation and its compiled parameters and
/// returns the raw JSON response. Signing, retries and connection handling
/// live behind this boundary.
pub trait StoreClient: Send + Sync + 'static {
    /// Send one wire operation.
    fn call(&self, operation: Operation, params: RequestParams) -> StoreFuture;

    /// `GetItem`
    fn get_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::GetItem, params)
    }

    /// `PutItem`
    fn put_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::PutItem, params)
    }

    /// `DeleteItem`
    fn delete_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::DeleteItem, params)
    }

    /// `UpdateItem`
    fn update_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::UpdateItem, params)
    }

    /// `Query`
    fn query(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::Query, params)
    }

    /// `Scan`
    fn scan(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::Scan, params)
    }

    /// `BatchGetItem`
    fn batch_get_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::BatchGetItem, params)
    }

    /// `BatchWriteItem`
    fn batch_write_item(&self, params: RequestParams) -> StoreFuture {
        self.call(Operation::BatchWriteItem, params)
    }
}

/// Dispatch a compiled operation to the client method of the same name.
pub async fn dispatch_operation<C: StoreClient + ?Sized>(
    client: &C,
    operation: Operation,
    params: RequestParams,
) -> Result<StoreResponse, StoreError> {
    tracing::debug!(operation = %operation, "dispatching store operation");
    match operation {
        Operation::GetItem => client.get_item(params),
        Operation::PutItem => client.put_item(params),
        Operation::DeleteItem => client.delete_item(params),
        Operation::UpdateItem => client.update_item(params),
        Operation::Query => client.query(params),
        Operation::Scan => client.scan(params),
        Operation::BatchGetItem => client.batch_get_item(params),
        Operation::BatchWriteItem => client.batch_write_item(params),
    }
    .await
}

/// Client that fails every call; the default of a connection without a
/// transport.
#[derive(Debug, Clone, Default)]
pub struct DisconnectedClient;

impl StoreClient for DisconnectedClient {
    fn call(&self, operation: Operation, _params: RequestParams) -> StoreFuture {
        Box::pin(async move {
            Err(dynaquery_model::store_error!(
                TransportError,
                format!("no store client configured for {operation}")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use dynaquery_model::error::StoreErrorCode;

    use super::*;

    #[tokio::test]
    async fn test_should_fail_every_call_without_transport() {
        let err = dispatch_operation(&DisconnectedClient, Operation::Scan, RequestParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::TransportError);
        assert!(err.message.contains("Scan"));
    }
}
