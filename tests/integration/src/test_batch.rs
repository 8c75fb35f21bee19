//! Batch reads and writes, including unprocessed entries.

#[cfg(test)]
mod tests {
    use dynaquery_core::{BatchRequest, QueryConfig};
    use dynaquery_model::types::WriteRequest;
    use dynaquery_model::{AttributeValue, Operation, Value, item};
    use serde_json::json;

    use crate::RecordingClient;

    #[tokio::test]
    async fn test_should_batch_get_across_one_table() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({
            "Responses": {"Thread": [
                {
                    "Replies": {"N": "0"},
                    "Answered": {"N": "0"},
                    "Views": {"N": "0"},
                    "ForumName": {"S": "Amazon DynamoDB"},
                    "Subject": {"S": "DynamoDB Thread 1"}
                },
                {
                    "Replies": {"N": "0"},
                    "Answered": {"N": "0"},
                    "Views": {"N": "0"},
                    "ForumName": {"S": "Amazon DynamoDB"},
                    "Subject": {"S": "DynamoDB Thread 2"}
                }
            ]},
            "UnprocessedKeys": {}
        }));

        let result = client
            .connection()
            .table("Thread")
            .batch_get_item(vec![
                item! { "ForumName" => "Amazon DynamoDB", "Subject" => "DynamoDB Thread 1" },
                item! { "ForumName" => "Amazon DynamoDB", "Subject" => "DynamoDB Thread 2" },
            ])
            .await?
            .into_batch_get()
            .ok_or_else(|| anyhow::anyhow!("expected batch get result"))?;

        let subjects: Vec<_> = result
            .items()
            .into_iter()
            .filter_map(|item| item.get("Subject").and_then(Value::as_str))
            .collect();
        assert_eq!(subjects, ["DynamoDB Thread 1", "DynamoDB Thread 2"]);
        assert!(result.meta.unprocessed_keys.is_empty());

        let calls = client.calls();
        assert_eq!(calls[0].operation, Operation::BatchGetItem);
        assert!(calls[0].body.get("TableName").is_none());
        assert_eq!(
            calls[0].body["RequestItems"]["Thread"]["Keys"][1]["Subject"],
            json!({"S": "DynamoDB Thread 2"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_should_surface_unprocessed_keys() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({
            "Responses": {"dev_Thread": []},
            "UnprocessedKeys": {"dev_Thread": {"Keys": [{"Id": {"N": "9"}}]}}
        }));
        let result = client
            .connection_with(QueryConfig::default().with_table_prefix("dev_"))
            .table("Thread")
            .batch_get_item(vec![item! { "Id" => 9 }])
            .await?
            .into_batch_get()
            .ok_or_else(|| anyhow::anyhow!("expected batch get result"))?;

        let pending = result
            .meta
            .unprocessed_keys
            .get("dev_Thread")
            .ok_or_else(|| anyhow::anyhow!("expected unprocessed keys"))?;
        assert_eq!(pending.keys[0].get("Id"), Some(&AttributeValue::N("9".to_owned())));
        Ok(())
    }

    #[tokio::test]
    async fn test_should_return_exactly_the_unprocessed_write() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({
            "UnprocessedItems": {"Thread": [
                {"PutRequest": {"Item": {
                    "ForumName": {"S": "Amazon DynamoDB"},
                    "Subject": {"S": "DynamoDB Thread 2"}
                }}}
            ]}
        }));

        let result = client
            .connection()
            .table("Thread")
            .batch_write_item(vec![
                BatchRequest::Put(item! {
                    "ForumName" => "Amazon DynamoDB",
                    "Subject" => "DynamoDB Thread 1",
                }),
                BatchRequest::Put(item! {
                    "ForumName" => "Amazon DynamoDB",
                    "Subject" => "DynamoDB Thread 2",
                }),
                BatchRequest::Delete(item! {
                    "ForumName" => "Amazon DynamoDB",
                    "Subject" => "DynamoDB Thread 0",
                }),
            ])
            .await?
            .into_batch_write()
            .ok_or_else(|| anyhow::anyhow!("expected batch write result"))?;

        assert!(!result.is_complete());
        let unprocessed = result
            .unprocessed
            .get("Thread")
            .ok_or_else(|| anyhow::anyhow!("expected unprocessed items"))?;
        assert_eq!(unprocessed.len(), 1);

        // The unprocessed entry is the second request as it was sent.
        let sent: Vec<WriteRequest> =
            serde_json::from_value(client.calls()[0].body["RequestItems"]["Thread"].clone())?;
        assert_eq!(sent.len(), 3);
        assert_eq!(unprocessed[0], sent[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_should_report_complete_batch_write() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({"UnprocessedItems": {}}));
        let result = client
            .connection()
            .table("Thread")
            .batch_put_item(vec![item! { "Id" => 1 }, item! { "Id" => 2 }])
            .await?
            .into_batch_write()
            .ok_or_else(|| anyhow::anyhow!("expected batch write result"))?;
        assert!(result.is_complete());
        Ok(())
    }
}
