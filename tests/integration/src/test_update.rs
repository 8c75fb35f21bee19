//! Updates, counters and concurrent requests.

#[cfg(test)]
mod tests {
    use dynaquery_model::{Operation, Value, item};
    use futures::future::try_join_all;
    use serde_json::json;

    use crate::RecordingClient;

    #[tokio::test]
    async fn test_should_update_and_decode_returned_attributes() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({
            "Attributes": {"Replies": {"N": "3"}, "LastPostedBy": {"S": "User A"}}
        }));
        let result = client
            .connection()
            .table("Thread")
            .key(item! { "ForumName" => "Laravel", "Subject" => "Laravel Thread 1" })
            .increment("Replies", 1, item! { "LastPostedBy" => "User A", "Tags" => Value::Null })
            .await?
            .into_single()
            .ok_or_else(|| anyhow::anyhow!("expected a single item result"))?;

        assert!(result.item.is_none());
        let attributes = result
            .attributes
            .ok_or_else(|| anyhow::anyhow!("expected returned attributes"))?;
        assert_eq!(attributes.get("Replies").and_then(Value::as_i64), Some(3));

        let calls = client.calls();
        assert_eq!(calls[0].operation, Operation::UpdateItem);
        assert_eq!(
            calls[0].body,
            json!({
                "TableName": "Thread",
                "Key": {"ForumName": {"S": "Laravel"}, "Subject": {"S": "Laravel Thread 1"}},
                "UpdateExpression": "set #1 = #1 + :1, #2 = :2 remove #3",
                "ReturnValues": "UPDATED_NEW",
                "ExpressionAttributeNames": {"#1": "Replies", "#2": "LastPostedBy", "#3": "Tags"},
                "ExpressionAttributeValues": {":1": {"N": "1"}, ":2": {"S": "User A"}}
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_should_delete_with_raw_response() -> anyhow::Result<()> {
        let client = RecordingClient::new();
        let response = client
            .connection()
            .table("Thread")
            .condition("Replies", ("=", 0))
            .delete_item(item! { "ForumName" => "Laravel", "Subject" => "Laravel Thread 1" })
            .await?
            .into_raw()
            .ok_or_else(|| anyhow::anyhow!("expected the raw response"))?;
        assert_eq!(response.body, json!({}));
        assert_eq!(client.calls()[0].body["ConditionExpression"], "#1 = :1");
        Ok(())
    }

    #[tokio::test]
    async fn test_should_number_placeholders_per_request() -> anyhow::Result<()> {
        let client = RecordingClient::new();
        let connection = client.connection();
        let requests = ["Amazon S3", "Amazon DynamoDB", "Amazon SQS"].map(|name| {
            connection
                .table("Forum")
                .filter("Category", "Amazon Web Services")
                .filter("Name", name)
                .scan()
        });
        try_join_all(requests).await?;

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        for call in calls {
            assert_eq!(call.body["FilterExpression"], "#1 = :1 and #2 = :2");
        }
        Ok(())
    }
}
