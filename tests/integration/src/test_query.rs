//! Query, scan and get round trips.

#[cfg(test)]
mod tests {
    use dynaquery_core::processor::{FromItem, Record};
    use dynaquery_core::{KeySchema, QueryConfig, Slot};
    use dynaquery_model::codec::CodecError;
    use dynaquery_model::{Item, Operation, Value, item};
    use serde_json::json;

    use crate::RecordingClient;

    fn forum_items() -> serde_json::Value {
        json!({
            "Items": [
                {"Category": {"S": "Amazon Web Services"}, "Name": {"S": "Amazon S3"}},
                {
                    "Threads": {"N": "2"},
                    "Category": {"S": "Amazon Web Services"},
                    "Messages": {"N": "4"},
                    "Views": {"N": "1000"},
                    "Name": {"S": "Amazon DynamoDB"}
                }
            ],
            "Count": 2,
            "ScannedCount": 2
        })
    }

    #[derive(Debug)]
    struct Forum {
        name: String,
        threads: i64,
    }

    impl FromItem for Forum {
        fn from_item(item: Item) -> Result<Self, CodecError> {
            Ok(Self {
                name: item
                    .get("Name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| CodecError::Conversion("forum without Name".to_owned()))?
                    .to_owned(),
                threads: item.get("Threads").and_then(Value::as_i64).unwrap_or(0),
            })
        }
    }

    #[tokio::test]
    async fn test_should_query_with_key_condition_and_filter() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(forum_items());
        let items = client
            .connection()
            .table("Thread")
            .key_condition("ForumName", "Amazon DynamoDB")
            .key_condition("Subject", ("begins_with", "DynamoDB"))
            .filter("Views", (">", 3))
            .select(["Subject", "Views"])
            .query()
            .await?
            .into_many()
            .ok_or_else(|| anyhow::anyhow!("expected items"))?;

        assert_eq!(items.len(), 2);
        assert_eq!(items.meta.count, Some(2));

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, Operation::Query);
        assert_eq!(
            calls[0].body,
            json!({
                "TableName": "Thread",
                "KeyConditionExpression": "#1 = :1 and begins_with(#2, :2)",
                "FilterExpression": "#3 > :3",
                "ProjectionExpression": "#2, #3",
                "ExpressionAttributeNames": {"#1": "ForumName", "#2": "Subject", "#3": "Views"},
                "ExpressionAttributeValues": {
                    ":1": {"S": "Amazon DynamoDB"},
                    ":2": {"S": "DynamoDB"},
                    ":3": {"N": "3"}
                }
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_should_promote_items_with_collection_metadata() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(forum_items());
        let records: Vec<Record<Forum>> = client
            .connection()
            .table("Forum")
            .scan()
            .await?
            .into_many()
            .ok_or_else(|| anyhow::anyhow!("expected items"))?
            .into_records()?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Amazon S3");
        assert_eq!(records[1].threads, 2);
        for record in &records {
            assert_eq!(record.meta.status, 200);
            assert_eq!(record.meta.scanned_count, Some(2));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_should_choose_query_or_scan_from_declared_keys() -> anyhow::Result<()> {
        let client = RecordingClient::new();
        let connection = client.connection();
        let schema = KeySchema::composite("ForumName", "Subject");

        connection
            .table("Thread")
            .with_keys(schema.clone())
            .key_condition("ForumName", "Amazon DynamoDB")
            .get()
            .await?;
        connection
            .table("Thread")
            .with_keys(schema)
            .filter("LastPostedBy", "User A")
            .get()
            .await?;

        let operations: Vec<_> = client.calls().into_iter().map(|c| c.operation).collect();
        assert_eq!(operations, [Operation::Query, Operation::Scan]);
        Ok(())
    }

    #[tokio::test]
    async fn test_should_count_even_in_dry_run_mode() -> anyhow::Result<()> {
        let client = RecordingClient::new().respond(json!({"Items": [], "Count": 7, "ScannedCount": 40}));
        let count = client
            .connection_with(QueryConfig::default().with_dry_run(true))
            .table("Thread")
            .key_condition("ForumName", "Amazon DynamoDB")
            .count()
            .await?;
        assert_eq!(count, 7);
        assert_eq!(client.calls().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_send_in_dry_run_mode() -> anyhow::Result<()> {
        let client = RecordingClient::new();
        let compiled = client
            .connection_with(QueryConfig::default().with_dry_run(true))
            .table("Forum")
            .on_slot(Slot::Filter, |q| {
                q.where_size("Tags", ">", 2).where_not_in("Category", ["Archive"]);
            })
            .scan()
            .await?
            .into_dry_run()
            .ok_or_else(|| anyhow::anyhow!("expected a dry run"))?;

        assert!(client.calls().is_empty());
        assert_eq!(compiled.operation, Operation::Scan);
        assert_eq!(compiled.decoder_name(), Some("multiple_items"));
        assert_eq!(
            compiled.params.filter_expression.as_deref(),
            Some("size(#1) > :1 and not (#2 in (:2))")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_should_get_single_item_or_none() -> anyhow::Result<()> {
        let client = RecordingClient::new()
            .respond(json!({"Item": {"Name": {"S": "Amazon DynamoDB"}, "Threads": {"N": "2"}}}))
            .respond(json!({}));
        let connection = client.connection();

        let found = connection
            .table("Forum")
            .get_item(Some(item! { "Name" => "Amazon DynamoDB" }))
            .await?
            .into_single()
            .ok_or_else(|| anyhow::anyhow!("expected a single item"))?
            .into_record::<Forum>()?
            .ok_or_else(|| anyhow::anyhow!("expected the forum"))?;
        assert_eq!(found.threads, 2);

        let missing = connection
            .table("Forum")
            .get_item(Some(item! { "Name" => "Nope" }))
            .await?
            .into_single()
            .ok_or_else(|| anyhow::anyhow!("expected a single item"))?;
        assert!(missing.item.is_none());
        Ok(())
    }
}
