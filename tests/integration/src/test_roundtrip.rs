//! Interned values decode back to exactly what was bound.

#[cfg(test)]
mod tests {
    use dynaquery_core::{QueryError, Slot};
    use dynaquery_model::codec::CodecError;
    use dynaquery_model::{Value, item};
    use serde_json::json;

    use crate::RecordingClient;

    fn every_variant() -> anyhow::Result<Vec<Value>> {
        Ok(vec![
            Value::Null,
            Value::Bool(false),
            Value::from(42),
            Value::try_from(-10.25_f64)?,
            Value::Number("1.5E+3".to_owned()),
            Value::from("Amazon DynamoDB"),
            Value::from(vec![0_u8, 159, 146, 150]),
            Value::StringSet(vec!["aws".to_owned(), "database".to_owned()]),
            Value::NumberSet(vec!["1".to_owned(), "2.5".to_owned()]),
            Value::BytesSet(vec![b"one".to_vec().into(), b"two".to_vec().into()]),
            Value::List(vec![Value::from("a"), Value::Null, Value::List(vec![Value::from(1)])]),
            Value::Map(item! {
                "Name" => "Amazon S3",
                "Stats" => item! { "Answered" => true, "Views" => 1000 },
                "Tags" => Value::List(vec![Value::from("storage")]),
            }),
        ])
    }

    #[tokio::test]
    async fn test_should_decode_every_interned_value_to_itself() -> anyhow::Result<()> {
        let values = every_variant()?;

        let sender = RecordingClient::new();
        let bound = values.clone();
        sender
            .connection()
            .table("Forum")
            .on_slot(Slot::Filter, move |q| {
                for (i, value) in bound.into_iter().enumerate() {
                    q.where_(&format!("Attr{i}"), ("=", value));
                }
            })
            .scan()
            .await?;
        let sent = sender.calls()[0].body["ExpressionAttributeValues"].clone();
        assert_eq!(sent.as_object().map(serde_json::Map::len), Some(values.len()));

        // The store echoes the bound values back as an item.
        let echo = RecordingClient::new().respond(json!({ "Item": sent }));
        let decoded = echo
            .connection()
            .table("Forum")
            .get_item(Some(item! { "Name" => "Amazon S3" }))
            .await?
            .into_single()
            .and_then(|result| result.item)
            .ok_or_else(|| anyhow::anyhow!("expected the echoed item"))?;

        // Echoed JSON objects come back with sorted keys; compare per key.
        assert_eq!(decoded.len(), values.len());
        for (i, value) in values.iter().enumerate() {
            let key = format!(":{}", i + 1);
            assert_eq!(decoded.get(&key), Some(value), "{key}");
        }
        assert_eq!(decoded.get(":2").and_then(Value::as_bool), Some(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_should_refuse_non_finite_numbers() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(Value::try_from(n), Err(CodecError::InvalidNumber(_))));
        }

        // A store that sends one back is reported, not decoded.
        let client = RecordingClient::new().respond(json!({"Item": {"Price": {"N": "NaN"}}}));
        let err = client
            .connection()
            .table("Product")
            .get_item(Some(item! { "Id" => 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Codec(CodecError::InvalidNumber(ref n)) if n == "NaN"));
    }
}
