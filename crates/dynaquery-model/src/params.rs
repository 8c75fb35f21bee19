//! The compiled parameter set of one outgoing wire call.
//!
//! Every optional attribute is omitted from the JSON body when absent or empty,
//! so a plain scan serializes to `{"TableName": "..."}` and nothing else.

use serde::Serialize;

use crate::attribute_value::AttributeMap;
use crate::ordered::OrderedMap;
use crate::types::{KeysAndAttributes, ReturnValue, WriteRequest};

/// Batch payload keyed by (prefixed) table name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestItems {
    /// `BatchGetItem`: keys to read per table.
    Get(OrderedMap<KeysAndAttributes>),
    /// `BatchWriteItem`: put/delete requests per table.
    Write(OrderedMap<Vec<WriteRequest>>),
}

/// Request parameters for any of the supported operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestParams {
    /// Target table. Absent for batch operations, which name their tables in
    /// `RequestItems`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Secondary index to read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Primary key of the addressed item.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub key: AttributeMap,
    /// Item payload of a put.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub item: AttributeMap,
    /// Rendered filter slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    /// Rendered condition slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    /// Rendered key-condition slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,
    /// Comma-separated name placeholders to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// `set ... remove ...` update actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,
    /// What an update returns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    /// Batch payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_items: Option<RequestItems>,
    /// Maximum number of items to evaluate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// Sort key direction of a query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    /// Continuation cursor from a previous page.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub exclusive_start_key: AttributeMap,
    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    /// `#n` placeholder to attribute name.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub expression_attribute_names: OrderedMap<String>,
    /// `:n` placeholder to typed value.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub expression_attribute_values: AttributeMap,
}

impl RequestParams {
    /// Parameters addressing `table`.
    #[must_use]
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table_name: Some(table.into()),
            ..Self::default()
        }
    }

    /// Serialize to the JSON request body.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::AttributeValue;

    #[test]
    fn test_should_serialize_only_table_name_for_plain_params() {
        let params = RequestParams::for_table("Thread");
        assert_eq!(params.to_json().unwrap(), serde_json::json!({"TableName": "Thread"}));
    }

    #[test]
    fn test_should_serialize_expression_attributes() {
        let params = RequestParams {
            key_condition_expression: Some("#1 = :1".to_owned()),
            expression_attribute_names: [("#1", "ForumName".to_owned())].into(),
            expression_attribute_values: [(":1", AttributeValue::S("DynamoDB".to_owned()))]
                .into(),
            limit: Some(5),
            scan_index_forward: Some(false),
            ..RequestParams::for_table("Thread")
        };
        assert_eq!(
            params.to_json().unwrap(),
            serde_json::json!({
                "TableName": "Thread",
                "KeyConditionExpression": "#1 = :1",
                "Limit": 5,
                "ScanIndexForward": false,
                "ExpressionAttributeNames": {"#1": "ForumName"},
                "ExpressionAttributeValues": {":1": {"S": "DynamoDB"}},
            })
        );
    }

    #[test]
    fn test_should_serialize_batch_write_items() {
        let key: AttributeMap = [("Id", AttributeValue::N("1".to_owned()))].into();
        let params = RequestParams {
            request_items: Some(RequestItems::Write(
                [("Thread", vec![WriteRequest::delete(key)])].into(),
            )),
            ..RequestParams::default()
        };
        assert_eq!(
            params.to_json().unwrap(),
            serde_json::json!({
                "RequestItems": {"Thread": [{"DeleteRequest": {"Key": {"Id": {"N": "1"}}}}]},
            })
        );
    }
}
