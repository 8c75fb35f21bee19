//! Error surfacing from every stage.

#[cfg(test)]
mod tests {
    use dynaquery_core::{KeySchema, QueryError, ShorthandArgs};
    use dynaquery_model::error::StoreErrorCode;
    use dynaquery_model::item;
    use serde_json::json;

    use crate::RecordingClient;

    #[tokio::test]
    async fn test_should_surface_store_error_unchanged() {
        let client = RecordingClient::new().fail(
            StoreErrorCode::ConditionalCheckFailedException,
            "The conditional request failed",
        );
        let err = client
            .connection()
            .table("ProductCatalog")
            .condition("Id", "attribute_not_exists")
            .put_item(item! { "Id" => 101 })
            .await
            .unwrap_err();

        let store = match err {
            QueryError::Store(store) => store,
            other => panic!("expected a store error, got {other:?}"),
        };
        assert_eq!(store.code, StoreErrorCode::ConditionalCheckFailedException);
        assert_eq!(store.message, "The conditional request failed");
        assert_eq!(store.status_code, http::StatusCode::BAD_REQUEST);
        assert!(!store.code.is_retryable());
    }

    #[tokio::test]
    async fn test_should_map_unknown_server_error_body() {
        let client = RecordingClient::new().fail_with(
            http::StatusCode::SERVICE_UNAVAILABLE,
            json!({"__type": "com.amazonaws.dynamodb.v20120810#SomethingNew"}),
        );
        let err = client.connection().table("Thread").scan().await.unwrap_err();
        let QueryError::Store(store) = err else {
            panic!("expected a store error");
        };
        assert_eq!(store.code, StoreErrorCode::InternalServerError);
        assert!(store.code.is_retryable());
        assert_eq!(store.message, "com.amazonaws.dynamodb.v20120810#SomethingNew");
    }

    #[tokio::test]
    async fn test_should_report_malformed_response_as_codec_error() {
        let client = RecordingClient::new().respond(json!({"Items": [{"Id": {"X": "1"}}]}));
        let err = client.connection().table("Thread").scan().await.unwrap_err();
        assert!(matches!(err, QueryError::Codec(_)), "{err}");
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_predicate_before_sending() {
        let client = RecordingClient::new();
        let err = client
            .connection()
            .table("Thread")
            .filter("Subject", ("like", "%DynamoDB%"))
            .scan()
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedPredicate { ref token, .. } if token == "like"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_incomplete_key_before_sending() {
        let client = RecordingClient::new();
        let err = client
            .connection()
            .table("Thread")
            .with_keys(KeySchema::composite("ForumName", "Subject"))
            .key(item! { "ForumName" => "Laravel" })
            .update_item(item! { "Replies" => 2 })
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingKey(_)), "{err}");
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_should_reject_undefined_shorthand() {
        let client = RecordingClient::new();
        let err = client
            .connection()
            .table("Thread")
            .invoke("filterNotIn", ShorthandArgs::in_("Subject", ["foo", "bar"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "call to undefined method filterNotIn");
    }
}
