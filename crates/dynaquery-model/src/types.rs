//! Shared wire types used by requests and responses.
//!
//! All types follow the DynamoDB JSON wire format with `PascalCase` field names.
//! Enum variants use idiomatic Rust naming with `#[serde(rename)]` to map to
//! the `SCREAMING_SNAKE_CASE` wire values.

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeMap;
use crate::ordered::OrderedMap;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Determines what values are returned by write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnValue {
    /// Nothing is returned.
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Returns all attributes of the item as they appeared before the operation.
    #[serde(rename = "ALL_OLD")]
    AllOld,
    /// Returns only the updated attributes as they appeared before the operation.
    #[serde(rename = "UPDATED_OLD")]
    UpdatedOld,
    /// Returns all attributes of the item as they appear after the operation.
    #[serde(rename = "ALL_NEW")]
    AllNew,
    /// Returns only the updated attributes as they appear after the operation.
    #[serde(rename = "UPDATED_NEW")]
    UpdatedNew,
}

impl ReturnValue {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::AllOld => "ALL_OLD",
            Self::UpdatedOld => "UPDATED_OLD",
            Self::AllNew => "ALL_NEW",
            Self::UpdatedNew => "UPDATED_NEW",
        }
    }
}

impl std::fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Consumed capacity
// ---------------------------------------------------------------------------

/// Capacity units consumed by an individual table or index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    /// The total read capacity units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// The total write capacity units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// The total capacity units consumed (read + write).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// Total capacity consumed by an operation across table and indexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// The name of the table that was affected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// The total capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    /// The total read capacity units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// The total write capacity units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// The capacity consumed by the table (excluding indexes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    /// The capacity consumed by each local secondary index.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub local_secondary_indexes: OrderedMap<Capacity>,
    /// The capacity consumed by each global secondary index.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub global_secondary_indexes: OrderedMap<Capacity>,
}

// ---------------------------------------------------------------------------
// Batch payloads
// ---------------------------------------------------------------------------

/// Describes the items to retrieve from a single table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    /// The primary keys of the items to retrieve.
    pub keys: Vec<AttributeMap>,
    /// The attributes to retrieve. If not specified, all attributes are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// Expression attribute names for substitution in `projection_expression`.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub expression_attribute_names: OrderedMap<String>,
    /// Whether to use a consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

/// A single write request within a `BatchWriteItem` operation.
///
/// Exactly one of `put_request` or `delete_request` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// A request to put an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// A request to delete an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put of `item`.
    #[must_use]
    pub fn put(item: AttributeMap) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete of `key`.
    #[must_use]
    pub fn delete(key: AttributeMap) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

/// A request to put an item within a `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    /// The item attributes to put.
    pub item: AttributeMap,
}

/// A request to delete an item within a `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    /// The primary key of the item to delete.
    pub key: AttributeMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::AttributeValue;

    #[test]
    fn test_should_serialize_write_request_with_put() {
        let item: AttributeMap = [("id", AttributeValue::S("123".to_owned()))].into();
        let json = serde_json::to_value(WriteRequest::put(item)).unwrap();
        assert_eq!(json, serde_json::json!({"PutRequest": {"Item": {"id": {"S": "123"}}}}));
    }

    #[test]
    fn test_should_serialize_write_request_with_delete() {
        let key: AttributeMap = [("id", AttributeValue::N("456".to_owned()))].into();
        let json = serde_json::to_value(WriteRequest::delete(key)).unwrap();
        assert_eq!(json, serde_json::json!({"DeleteRequest": {"Key": {"id": {"N": "456"}}}}));
    }

    #[test]
    fn test_should_roundtrip_consumed_capacity() {
        let cap = ConsumedCapacity {
            table_name: Some("Orders".to_owned()),
            capacity_units: Some(5.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&cap).unwrap();
        assert_eq!(json, r#"{"TableName":"Orders","CapacityUnits":5.0}"#);
        let parsed: ConsumedCapacity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cap);
    }

    #[test]
    fn test_should_omit_empty_keys_and_attributes_fields() {
        let ka = KeysAndAttributes {
            keys: vec![[("pk", AttributeValue::S("user-1".to_owned()))].into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&ka).unwrap();
        assert_eq!(json, serde_json::json!({"Keys": [{"pk": {"S": "user-1"}}]}));
    }

    #[test]
    fn test_should_render_return_value() {
        assert_eq!(ReturnValue::UpdatedNew.to_string(), "UPDATED_NEW");
        assert_eq!(
            serde_json::to_value(ReturnValue::UpdatedNew).unwrap(),
            serde_json::json!("UPDATED_NEW")
        );
    }
}
