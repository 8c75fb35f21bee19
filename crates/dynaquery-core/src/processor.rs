//! Response decoding.
//!
//! Each decoder turns the raw JSON body of one operation into plain items plus
//! a [`Metadata`] record. Decoding is total over well-formed responses and
//! keeps item order; a body that does not fit the expected shape is a
//! [`CodecError`].

use std::ops::Deref;

use dynaquery_model::codec::{CodecError, unmarshal_item};
use dynaquery_model::output::{BatchGetItemOutput, BatchWriteItemOutput, ItemOutput, ItemsOutput};
use dynaquery_model::types::{ConsumedCapacity, KeysAndAttributes, WriteRequest};
use dynaquery_model::{AttributeMap, Item, Operation, OrderedMap};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::StoreResponse;

/// Which decoder handles an operation's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoder {
    /// [`decode_single`]
    SingleItem,
    /// [`decode_many`]
    MultipleItems,
    /// [`decode_batch_get`]
    BatchGetItems,
    /// [`decode_batch_write`]
    BatchWriteItems,
}

impl Decoder {
    /// Decoder name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleItem => "single_item",
            Self::MultipleItems => "multiple_items",
            Self::BatchGetItems => "batch_get_items",
            Self::BatchWriteItems => "batch_write_items",
        }
    }

    /// Decoder of `operation`; `None` means the raw response is returned.
    #[must_use]
    pub fn for_operation(operation: Operation) -> Option<Self> {
        match operation {
            Operation::GetItem | Operation::UpdateItem => Some(Self::SingleItem),
            Operation::Query | Operation::Scan => Some(Self::MultipleItems),
            Operation::BatchGetItem => Some(Self::BatchGetItems),
            Operation::BatchWriteItem => Some(Self::BatchWriteItems),
            Operation::PutItem | Operation::DeleteItem => None,
        }
    }
}

/// Response metadata shared by every decoded result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// HTTP status of the call.
    pub status: http::StatusCode,
    /// Items returned (query/scan).
    pub count: Option<i32>,
    /// Items evaluated before the filter (query/scan).
    pub scanned_count: Option<i32>,
    /// Continuation cursor; present only when the result was truncated.
    pub last_evaluated_key: Option<AttributeMap>,
    /// Capacity consumed, one entry per table.
    pub consumed_capacity: Vec<ConsumedCapacity>,
    /// Batch-get keys the store did not get to.
    pub unprocessed_keys: OrderedMap<KeysAndAttributes>,
}

impl Metadata {
    fn with_status(status: http::StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Caller type an item can be promoted to.
pub trait FromItem: Sized {
    /// Build `Self` from a decoded item.
    fn from_item(item: Item) -> Result<Self, CodecError>;
}

impl FromItem for Item {
    fn from_item(item: Item) -> Result<Self, CodecError> {
        Ok(item)
    }
}

/// A promoted item carrying the metadata of the response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    /// The promoted item.
    pub value: T,
    /// Metadata of the response.
    pub meta: Metadata,
}

impl<T> Record<T> {
    /// Drop the metadata.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Decoded single-item response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemResult {
    /// `Item` of a `GetItem`.
    pub item: Option<Item>,
    /// `Attributes` of a write with `ReturnValues`.
    pub attributes: Option<Item>,
    /// Response metadata.
    pub meta: Metadata,
}

impl ItemResult {
    /// Promote `item`; returned attributes are never promoted.
    pub fn into_record<T: FromItem>(self) -> Result<Option<Record<T>>, CodecError> {
        let Self { item, meta, .. } = self;
        match item {
            Some(item) => Ok(Some(Record {
                value: T::from_item(item)?,
                meta,
            })),
            None => Ok(None),
        }
    }
}

/// Decoded query/scan response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCollection {
    /// Items in response order.
    pub items: Vec<Item>,
    /// Response metadata.
    pub meta: Metadata,
}

impl ItemCollection {
    /// Cursor to pass as `exclusive_start_key` for the next page.
    #[must_use]
    pub fn last_evaluated_key(&self) -> Option<&AttributeMap> {
        self.meta.last_evaluated_key.as_ref()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item was returned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Promote every item; each record carries a copy of the metadata.
    pub fn into_records<T: FromItem>(self) -> Result<Vec<Record<T>>, CodecError> {
        promote(self.items, &self.meta)
    }
}

impl IntoIterator for ItemCollection {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Decoded batch-get response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetResult {
    /// Items per table.
    pub responses: OrderedMap<Vec<Item>>,
    /// Response metadata, including unprocessed keys.
    pub meta: Metadata,
}

impl BatchGetResult {
    /// All items, table by table.
    #[must_use]
    pub fn items(&self) -> Vec<&Item> {
        self.responses.values().flatten().collect()
    }

    /// Promote every item of every table.
    pub fn into_records<T: FromItem>(self) -> Result<Vec<Record<T>>, CodecError> {
        let items = self.responses.into_iter().flat_map(|(_, items)| items).collect();
        promote(items, &self.meta)
    }
}

/// Decoded batch-write response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteResult {
    /// Requests the store did not process, per table.
    pub unprocessed: OrderedMap<Vec<WriteRequest>>,
    /// Response metadata.
    pub meta: Metadata,
}

impl BatchWriteResult {
    /// Returns `true` if every request was processed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unprocessed.values().all(Vec::is_empty)
    }
}

fn promote<T: FromItem>(items: Vec<Item>, meta: &Metadata) -> Result<Vec<Record<T>>, CodecError> {
    items
        .into_iter()
        .map(|item| {
            Ok(Record {
                value: T::from_item(item)?,
                meta: meta.clone(),
            })
        })
        .collect()
}

fn parse<T: DeserializeOwned>(shape: &'static str, body: serde_json::Value) -> Result<T, CodecError> {
    serde_json::from_value(body).map_err(|source| CodecError::MalformedResponse { shape, source })
}

/// Decode `GetItem` / `UpdateItem` responses.
pub fn decode_single(response: StoreResponse) -> Result<ItemResult, CodecError> {
    let output: ItemOutput = parse("single item", response.body)?;
    let item = output
        .item
        .filter(|item| !item.is_empty())
        .map(unmarshal_item)
        .transpose()?;
    let attributes = output
        .attributes
        .filter(|attrs| !attrs.is_empty())
        .map(unmarshal_item)
        .transpose()?;

    let mut meta = Metadata::with_status(response.status);
    meta.consumed_capacity.extend(output.consumed_capacity);
    debug!(found = item.is_some(), "decoded single item response");

    Ok(ItemResult {
        item,
        attributes,
        meta,
    })
}

/// Decode `Query` / `Scan` responses.
pub fn decode_many(response: StoreResponse) -> Result<ItemCollection, CodecError> {
    let output: ItemsOutput = parse("multiple items", response.body)?;
    let items = output
        .items
        .into_iter()
        .map(unmarshal_item)
        .collect::<Result<Vec<_>, _>>()?;

    let meta = Metadata {
        count: output.count,
        scanned_count: output.scanned_count,
        last_evaluated_key: output.last_evaluated_key.filter(|key| !key.is_empty()),
        consumed_capacity: output.consumed_capacity.into_iter().collect(),
        ..Metadata::with_status(response.status)
    };
    debug!(
        items = items.len(),
        truncated = meta.last_evaluated_key.is_some(),
        "decoded multiple items response"
    );

    Ok(ItemCollection { items, meta })
}

/// Decode `BatchGetItem` responses.
pub fn decode_batch_get(response: StoreResponse) -> Result<BatchGetResult, CodecError> {
    let output: BatchGetItemOutput = parse("batch get", response.body)?;
    let responses = output.responses.try_map_values(|items| {
        items
            .into_iter()
            .map(unmarshal_item)
            .collect::<Result<Vec<_>, _>>()
    })?;

    if !output.unprocessed_keys.is_empty() {
        warn!(
            tables = output.unprocessed_keys.len(),
            "batch get returned unprocessed keys"
        );
    }
    let meta = Metadata {
        consumed_capacity: output.consumed_capacity,
        unprocessed_keys: output.unprocessed_keys,
        ..Metadata::with_status(response.status)
    };

    Ok(BatchGetResult { responses, meta })
}

/// Decode `BatchWriteItem` responses.
pub fn decode_batch_write(response: StoreResponse) -> Result<BatchWriteResult, CodecError> {
    let output: BatchWriteItemOutput = parse("batch write", response.body)?;
    let result = BatchWriteResult {
        unprocessed: output.unprocessed_items,
        meta: Metadata {
            consumed_capacity: output.consumed_capacity,
            ..Metadata::with_status(response.status)
        },
    };

    if !result.is_complete() {
        let requests: usize = result.unprocessed.values().map(Vec::len).sum();
        warn!(requests, "batch write returned unprocessed items");
    }
    Ok(result)
}
