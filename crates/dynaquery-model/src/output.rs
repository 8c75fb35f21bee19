//! Raw response shapes, one per decoder.
//!
//! Output structs use `PascalCase` JSON field naming to match the DynamoDB
//! wire protocol. Absent fields deserialize to their empty defaults, so an
//! empty `{}` body is a valid (empty) response of every shape.

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeMap;
use crate::ordered::OrderedMap;
use crate::types::{ConsumedCapacity, KeysAndAttributes, WriteRequest};

/// Output of `GetItem`, `PutItem`, `UpdateItem` and `DeleteItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemOutput {
    /// The item read by `GetItem`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<AttributeMap>,
    /// Attributes returned by a write with `ReturnValues`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
    /// Capacity consumed by the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output of `Query` and `Scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsOutput {
    /// Items matching the request.
    #[serde(default)]
    pub items: Vec<AttributeMap>,
    /// Number of items returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    /// Number of items evaluated before the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanned_count: Option<i32>,
    /// Present when the result was truncated; pass back as
    /// `ExclusiveStartKey` to continue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<AttributeMap>,
    /// Capacity consumed by the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output of `BatchGetItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Items per table, in response order.
    #[serde(default)]
    pub responses: OrderedMap<Vec<AttributeMap>>,
    /// Keys the store did not get to; resend them as `RequestItems`.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub unprocessed_keys: OrderedMap<KeysAndAttributes>,
    /// Capacity consumed per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

/// Output of `BatchWriteItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Write requests the store did not get to; resend them as `RequestItems`.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub unprocessed_items: OrderedMap<Vec<WriteRequest>>,
    /// Capacity consumed per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}
