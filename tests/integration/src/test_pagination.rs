//! Following `LastEvaluatedKey` across pages.

#[cfg(test)]
mod tests {
    use dynaquery_core::{Connection, ItemCollection, QueryResult};
    use dynaquery_model::{AttributeMap, Operation, Value};
    use serde_json::json;

    use crate::RecordingClient;

    async fn page(connection: &Connection, cursor: Option<AttributeMap>) -> QueryResult<ItemCollection> {
        let mut builder = connection.table("Reply").limit(2);
        if let Some(cursor) = cursor {
            builder = builder.exclusive_start_key(cursor);
        }
        Ok(builder.scan().await?.into_many().unwrap_or_default())
    }

    #[tokio::test]
    async fn test_should_follow_cursor_until_exhausted() -> anyhow::Result<()> {
        let client = RecordingClient::new()
            .respond(json!({
                "Items": [{"Id": {"N": "1"}}, {"Id": {"N": "2"}}],
                "Count": 2,
                "ScannedCount": 2,
                "LastEvaluatedKey": {"Id": {"N": "2"}}
            }))
            .respond(json!({
                "Items": [{"Id": {"N": "3"}}],
                "Count": 1,
                "ScannedCount": 1
            }));
        let connection = client.connection();

        let mut ids = Vec::new();
        let mut cursor = None;
        loop {
            let items = page(&connection, cursor.take()).await?;
            ids.extend(items.iter().filter_map(|item| item.get("Id").and_then(Value::as_i64)));
            match items.last_evaluated_key() {
                Some(key) => cursor = Some(key.clone()),
                None => break,
            }
        }
        assert_eq!(ids, [1, 2, 3]);

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.operation == Operation::Scan));
        assert_eq!(calls[0].body, json!({"TableName": "Reply", "Limit": 2}));
        assert_eq!(
            calls[1].body,
            json!({"TableName": "Reply", "Limit": 2, "ExclusiveStartKey": {"Id": {"N": "2"}}})
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_should_report_no_cursor_on_last_page() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({"Items": [], "Count": 0, "ScannedCount": 2}));
        let items = page(&client.connection(), None).await?;
        assert!(items.is_empty());
        assert!(items.last_evaluated_key().is_none());
        assert_eq!(items.meta.scanned_count, Some(2));
        Ok(())
    }
}
