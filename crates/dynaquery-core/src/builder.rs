//! Fluent request builder.
//!
//! A [`RequestBuilder`] addresses one table. Fluent calls accumulate key,
//! item, update actions, options and clauses for the three expression slots;
//! an operation method then compiles everything into [`RequestParams`] and
//! either returns it (dry run) or sends it and decodes the response.
//!
//! ```ignore
//! let threads = connection
//!     .table("Thread")
//!     .key_condition("ForumName", "Amazon DynamoDB")
//!     .filter("Views", (">", 3))
//!     .query()
//!     .await?;
//! ```

use std::sync::Arc;

use dynaquery_model::params::RequestParams;
use dynaquery_model::{AttributeMap, Item, Operation, OrderedMap, Value};
use tracing::debug;

use crate::client::{StoreClient, StoreResponse, dispatch_operation};
use crate::config::QueryConfig;
use crate::dispatch::{ShorthandArgs, Slot, resolve};
use crate::error::{QueryError, QueryResult};
use crate::grammar::{BatchRequest, Grammar};
use crate::key::KeySchema;
use crate::placeholder::SharedPlaceholders;
use crate::predicate::{Connector, PredicateBuilder, WhereArgs};
use crate::processor::{
    BatchGetResult, BatchWriteResult, Decoder, ItemCollection, ItemResult, decode_batch_get,
    decode_batch_write, decode_many, decode_single,
};
use crate::update::UpdateActions;

/// A compiled request that was not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    /// Wire operation.
    pub operation: Operation,
    /// Compiled parameters.
    pub params: RequestParams,
    /// Decoder the response would go through.
    pub decoder: Option<Decoder>,
}

impl Compiled {
    /// Name of the decoder, if any.
    #[must_use]
    pub fn decoder_name(&self) -> Option<&'static str> {
        self.decoder.as_ref().map(Decoder::as_str)
    }
}

/// Result of an operation method.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Dry run: the request as it would have been sent.
    DryRun(Compiled),
    /// `GetItem` / `UpdateItem`
    Single(ItemResult),
    /// `Query` / `Scan`
    Many(ItemCollection),
    /// `BatchGetItem`
    BatchGet(BatchGetResult),
    /// `BatchWriteItem`
    BatchWrite(BatchWriteResult),
    /// `PutItem` / `DeleteItem`: the undecoded response.
    Raw(StoreResponse),
}

impl Outcome {
    /// The compiled request of a dry run.
    #[must_use]
    pub fn into_dry_run(self) -> Option<Compiled> {
        match self {
            Self::DryRun(compiled) => Some(compiled),
            _ => None,
        }
    }

    /// The single-item result.
    #[must_use]
    pub fn into_single(self) -> Option<ItemResult> {
        match self {
            Self::Single(result) => Some(result),
            _ => None,
        }
    }

    /// The query/scan result.
    #[must_use]
    pub fn into_many(self) -> Option<ItemCollection> {
        match self {
            Self::Many(collection) => Some(collection),
            _ => None,
        }
    }

    /// The batch-get result.
    #[must_use]
    pub fn into_batch_get(self) -> Option<BatchGetResult> {
        match self {
            Self::BatchGet(result) => Some(result),
            _ => None,
        }
    }

    /// The batch-write result.
    #[must_use]
    pub fn into_batch_write(self) -> Option<BatchWriteResult> {
        match self {
            Self::BatchWrite(result) => Some(result),
            _ => None,
        }
    }

    /// The raw response.
    #[must_use]
    pub fn into_raw(self) -> Option<StoreResponse> {
        match self {
            Self::Raw(response) => Some(response),
            _ => None,
        }
    }
}

macro_rules! slot_methods {
    (
        $field:ident, $slot:literal:
        $and:ident, $or:ident,
        $and_in:ident, $or_in:ident,
        $and_between:ident, $or_between:ident,
        $and_nested:ident, $or_nested:ident
    ) => {
        #[doc = concat!("`and` clause on the ", $slot, ".")]
        #[must_use]
        pub fn $and(mut self, column: &str, args: impl Into<WhereArgs>) -> Self {
            self.$field.add_where(column, args, Connector::And);
            self
        }

        #[doc = concat!("`or` clause on the ", $slot, ".")]
        #[must_use]
        pub fn $or(mut self, column: &str, args: impl Into<WhereArgs>) -> Self {
            self.$field.add_where(column, args, Connector::Or);
            self
        }

        #[doc = concat!("`and ({column} in (...))` on the ", $slot, ".")]
        #[must_use]
        pub fn $and_in<V: Into<Value>>(
            mut self,
            column: &str,
            values: impl IntoIterator<Item = V>,
        ) -> Self {
            self.$field.add_in(column, values, Connector::And, false);
            self
        }

        #[doc = concat!("`or ({column} in (...))` on the ", $slot, ".")]
        #[must_use]
        pub fn $or_in<V: Into<Value>>(
            mut self,
            column: &str,
            values: impl IntoIterator<Item = V>,
        ) -> Self {
            self.$field.add_in(column, values, Connector::Or, false);
            self
        }

        #[doc = concat!("`and ({column} between ...)` on the ", $slot, ".")]
        #[must_use]
        pub fn $and_between(
            mut self,
            column: &str,
            low: impl Into<Value>,
            high: impl Into<Value>,
        ) -> Self {
            self.$field.add_between(column, low, high, Connector::And, false);
            self
        }

        #[doc = concat!("`or ({column} between ...)` on the ", $slot, ".")]
        #[must_use]
        pub fn $or_between(
            mut self,
            column: &str,
            low: impl Into<Value>,
            high: impl Into<Value>,
        ) -> Self {
            self.$field.add_between(column, low, high, Connector::Or, false);
            self
        }

        #[doc = concat!("`and (...)` group on the ", $slot, ".")]
        #[must_use]
        pub fn $and_nested(mut self, build: impl FnOnce(&mut PredicateBuilder)) -> Self {
            self.$field.add_nested(build, Connector::And);
            self
        }

        #[doc = concat!("`or (...)` group on the ", $slot, ".")]
        #[must_use]
        pub fn $or_nested(mut self, build: impl FnOnce(&mut PredicateBuilder)) -> Self {
            self.$field.add_nested(build, Connector::Or);
            self
        }
    };
}

/// Builder of one request against one table.
pub struct RequestBuilder {
    client: Arc<dyn StoreClient>,
    grammar: Grammar,
    table: String,
    index: Option<String>,
    key: Item,
    item: Item,
    updates: UpdateActions,
    columns: Vec<String>,
    limit: Option<i32>,
    scan_index_forward: Option<bool>,
    exclusive_start_key: AttributeMap,
    consistent_read: Option<bool>,
    dry_run: bool,
    key_schema: Option<KeySchema>,
    placeholders: SharedPlaceholders,
    filter_query: PredicateBuilder,
    condition_query: PredicateBuilder,
    key_condition_query: PredicateBuilder,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("table", &self.table)
            .field("index", &self.index)
            .field("key", &self.key)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    /// A builder for `table` with a fresh placeholder table.
    pub fn new(client: Arc<dyn StoreClient>, config: &QueryConfig, table: impl Into<String>) -> Self {
        let placeholders = SharedPlaceholders::new();
        Self {
            client,
            grammar: Grammar::new(config.table_prefix.clone()),
            table: table.into(),
            index: None,
            key: Item::new(),
            item: Item::new(),
            updates: UpdateActions::default(),
            columns: Vec::new(),
            limit: None,
            scan_index_forward: None,
            exclusive_start_key: AttributeMap::new(),
            consistent_read: config.consistent_read.then_some(true),
            dry_run: config.dry_run,
            key_schema: None,
            filter_query: PredicateBuilder::new(placeholders.clone()),
            condition_query: PredicateBuilder::new(placeholders.clone()),
            key_condition_query: PredicateBuilder::new(placeholders.clone()),
            placeholders,
        }
    }

    /// Read from a secondary index.
    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Address the item with this primary key.
    #[must_use]
    pub fn key(mut self, key: Item) -> Self {
        self.key = key;
        self
    }

    /// Maximum number of items to evaluate.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort key direction of a query; `false` is descending.
    #[must_use]
    pub fn scan_index_forward(mut self, forward: bool) -> Self {
        self.scan_index_forward = Some(forward);
        self
    }

    /// Continue after a previous page's `LastEvaluatedKey`, sent as is.
    #[must_use]
    pub fn exclusive_start_key(mut self, key: AttributeMap) -> Self {
        self.exclusive_start_key = key;
        self
    }

    /// Request a strongly consistent read.
    #[must_use]
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Attributes to return.
    #[must_use]
    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Compile without sending.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Declare the table's key columns.
    ///
    /// Keys are then checked for completeness and [`RequestBuilder::get`] can
    /// tell a query from a scan.
    #[must_use]
    pub fn with_keys(mut self, schema: KeySchema) -> Self {
        self.key_schema = Some(schema);
        self
    }

    slot_methods!(filter_query, "filter slot":
        filter, or_filter,
        filter_in, or_filter_in,
        filter_between, or_filter_between,
        filter_nested, or_filter_nested);

    slot_methods!(condition_query, "condition slot":
        condition, or_condition,
        condition_in, or_condition_in,
        condition_between, or_condition_between,
        condition_nested, or_condition_nested);

    slot_methods!(key_condition_query, "key-condition slot":
        key_condition, or_key_condition,
        key_condition_in, or_key_condition_in,
        key_condition_between, or_key_condition_between,
        key_condition_nested, or_key_condition_nested);

    // Generic clauses land in the filter slot.
    slot_methods!(filter_query, "filter slot":
        where_, or_where,
        where_in, or_where_in,
        where_between, or_where_between,
        where_nested, or_where_nested);

    /// Edit a slot directly, for clauses without a fluent shortcut
    /// (`where_size`, `where_not_in`, ...).
    #[must_use]
    pub fn on_slot(mut self, slot: Slot, build: impl FnOnce(&mut PredicateBuilder)) -> Self {
        build(self.slot_mut(slot));
        self
    }

    /// Call a shorthand method by name, e.g. `"orFilterBetween"`.
    pub fn invoke(mut self, method: &str, args: ShorthandArgs) -> QueryResult<Self> {
        let method = resolve(method)?;
        method.apply(self.slot_mut(method.slot), args)?;
        Ok(self)
    }

    /// Clauses of `slot`.
    #[must_use]
    pub fn slot(&self, slot: Slot) -> &PredicateBuilder {
        match slot {
            Slot::Filter => &self.filter_query,
            Slot::Condition => &self.condition_query,
            Slot::KeyCondition => &self.key_condition_query,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut PredicateBuilder {
        match slot {
            Slot::Filter => &mut self.filter_query,
            Slot::Condition => &mut self.condition_query,
            Slot::KeyCondition => &mut self.key_condition_query,
        }
    }

    /// The placeholder table shared by every slot of this request.
    #[must_use]
    pub fn placeholders(&self) -> &SharedPlaceholders {
        &self.placeholders
    }

    /// Returns `true` if a declared key column has been interned, i.e. the
    /// request constrains the key and can run as a `Query`.
    #[must_use]
    pub fn targets_key(&self) -> bool {
        self.key_schema.as_ref().is_some_and(|schema| {
            let table = self.placeholders.lock();
            schema.columns().any(|column| table.has_column(column))
        })
    }

    /// `GetItem`, optionally setting the key first.
    pub async fn get_item(mut self, key: Option<Item>) -> QueryResult<Outcome> {
        if let Some(key) = key {
            self.key = key;
        }
        self.require_key(Operation::GetItem)?;
        self.process(Operation::GetItem).await
    }

    /// `PutItem`
    pub async fn put_item(mut self, item: Item) -> QueryResult<Outcome> {
        if let Some(schema) = &self.key_schema {
            schema.validate(&item)?;
        }
        self.item = item;
        self.process(Operation::PutItem).await
    }

    /// `DeleteItem`
    pub async fn delete_item(mut self, key: Item) -> QueryResult<Outcome> {
        self.key = key;
        self.require_key(Operation::DeleteItem)?;
        self.process(Operation::DeleteItem).await
    }

    /// `UpdateItem`: null attributes are removed, others are set.
    pub async fn update_item(mut self, item: Item) -> QueryResult<Outcome> {
        self.require_key(Operation::UpdateItem)?;
        self.updates.assign(&self.placeholders, &item);
        self.process(Operation::UpdateItem).await
    }

    /// Add `amount` to `column`, updating `extra` alongside.
    pub async fn increment(
        mut self,
        column: &str,
        amount: impl Into<Value>,
        extra: Item,
    ) -> QueryResult<Outcome> {
        self.updates.increment(&self.placeholders, column, amount);
        self.update_item(extra).await
    }

    /// Subtract `amount` from `column`, updating `extra` alongside.
    pub async fn decrement(
        mut self,
        column: &str,
        amount: impl Into<Value>,
        extra: Item,
    ) -> QueryResult<Outcome> {
        self.updates.decrement(&self.placeholders, column, amount);
        self.update_item(extra).await
    }

    /// `Query`
    pub async fn query(self) -> QueryResult<Outcome> {
        self.process(Operation::Query).await
    }

    /// `Scan`
    pub async fn scan(self) -> QueryResult<Outcome> {
        self.process(Operation::Scan).await
    }

    /// `Query` if a declared key column is constrained, `Scan` otherwise.
    pub async fn get(self) -> QueryResult<Outcome> {
        if self.targets_key() {
            self.query().await
        } else {
            self.scan().await
        }
    }

    /// Number of items a `Query` returns. Always executes.
    pub async fn count(mut self) -> QueryResult<usize> {
        self.dry_run = false;
        Ok(self.query().await?.into_many().map_or(0, |c| total(&c)))
    }

    /// Number of items a `Scan` returns. Always executes.
    pub async fn count_scan(mut self) -> QueryResult<usize> {
        self.dry_run = false;
        Ok(self.scan().await?.into_many().map_or(0, |c| total(&c)))
    }

    /// `BatchGetItem` of `keys`; the projection travels with the keys.
    pub async fn batch_get_item(self, keys: Vec<Item>) -> QueryResult<Outcome> {
        self.reject_clauses(Operation::BatchGetItem)?;
        if keys.is_empty() {
            return Err(QueryError::MissingKey(format!(
                "{} of {} needs at least one key",
                Operation::BatchGetItem,
                self.table
            )));
        }
        for key in &keys {
            self.check_key(Operation::BatchGetItem, key)?;
        }

        let projection = Grammar::compile_projection(&self.placeholders, &self.columns);
        let names: OrderedMap<String> = self
            .columns
            .iter()
            .map(|column| (self.placeholders.intern_name(column), column.clone()))
            .collect();
        let params = RequestParams {
            request_items: Some(self.grammar.compile_batch_get(
                &self.table,
                &keys,
                projection,
                names,
                self.consistent_read,
            )),
            ..RequestParams::default()
        };
        self.send(Operation::BatchGetItem, params).await
    }

    /// `BatchWriteItem` putting every item.
    pub async fn batch_put_item(self, items: Vec<Item>) -> QueryResult<Outcome> {
        self.batch_write_item(items.into_iter().map(BatchRequest::Put).collect())
            .await
    }

    /// `BatchWriteItem` deleting every key.
    pub async fn batch_delete_item(self, keys: Vec<Item>) -> QueryResult<Outcome> {
        self.batch_write_item(keys.into_iter().map(BatchRequest::Delete).collect())
            .await
    }

    /// `BatchWriteItem` of mixed puts and deletes.
    pub async fn batch_write_item(self, requests: Vec<BatchRequest>) -> QueryResult<Outcome> {
        self.reject_clauses(Operation::BatchWriteItem)?;
        if requests.is_empty() {
            return Err(QueryError::MissingKey(format!(
                "{} of {} needs at least one request",
                Operation::BatchWriteItem,
                self.table
            )));
        }
        for request in &requests {
            match request {
                BatchRequest::Delete(key) => self.check_key(Operation::BatchWriteItem, key)?,
                BatchRequest::Put(item) => {
                    if let Some(schema) = &self.key_schema {
                        schema.validate(item)?;
                    }
                }
            }
        }
        let params = RequestParams {
            request_items: Some(self.grammar.compile_batch_write(&self.table, &requests)),
            ..RequestParams::default()
        };
        self.send(Operation::BatchWriteItem, params).await
    }

    /// Batch requests carry no expressions.
    fn reject_clauses(&self, operation: Operation) -> QueryResult<()> {
        match Slot::ALL.into_iter().find(|slot| !self.slot(*slot).is_empty()) {
            Some(slot) => Err(QueryError::unsupported(
                slot.wire_name(),
                format!("{operation} does not accept expressions"),
            )),
            None => Ok(()),
        }
    }

    fn require_key(&self, operation: Operation) -> QueryResult<()> {
        self.check_key(operation, &self.key)
    }

    fn check_key(&self, operation: Operation, key: &Item) -> QueryResult<()> {
        if key.is_empty() {
            return Err(QueryError::MissingKey(format!(
                "{operation} of {} needs a key",
                self.table
            )));
        }
        match &self.key_schema {
            Some(schema) => schema.validate(key),
            None => Ok(()),
        }
    }

    fn compile(&self, operation: Operation) -> QueryResult<RequestParams> {
        // Interning renderers first; the placeholder maps are dumped last.
        let projection_expression = Grammar::compile_projection(&self.placeholders, &self.columns);
        let filter_expression = Grammar::compile_conditions(&self.filter_query)?;
        let condition_expression = Grammar::compile_conditions(&self.condition_query)?;
        let key_condition_expression = Grammar::compile_conditions(&self.key_condition_query)?;

        let table = self.placeholders.lock();
        let (update_expression, return_values) =
            Grammar::compile_update(&table, &self.updates)?.unzip();
        let (expression_attribute_names, expression_attribute_values) =
            Grammar::compile_placeholder_maps(&table);

        let is_read = matches!(
            operation,
            Operation::GetItem | Operation::Query | Operation::Scan
        );

        Ok(RequestParams {
            table_name: Some(self.grammar.compile_table_name(&self.table)),
            index_name: Grammar::compile_index_name(self.index.as_deref()),
            key: Grammar::compile_key(&self.key),
            item: Grammar::compile_item(&self.item),
            filter_expression,
            condition_expression,
            key_condition_expression,
            projection_expression,
            update_expression,
            return_values,
            request_items: None,
            limit: self.limit,
            scan_index_forward: self.scan_index_forward,
            exclusive_start_key: self.exclusive_start_key.clone(),
            consistent_read: if is_read {
                Grammar::compile_consistent_read(self.consistent_read)
            } else {
                None
            },
            expression_attribute_names,
            expression_attribute_values,
        })
    }

    async fn process(self, operation: Operation) -> QueryResult<Outcome> {
        let params = self.compile(operation)?;
        self.send(operation, params).await
    }

    async fn send(self, operation: Operation, params: RequestParams) -> QueryResult<Outcome> {
        let decoder = Decoder::for_operation(operation);
        debug!(
            operation = %operation,
            table = %self.table,
            dry_run = self.dry_run,
            "compiled request"
        );
        if self.dry_run {
            return Ok(Outcome::DryRun(Compiled {
                operation,
                params,
                decoder,
            }));
        }

        let response = dispatch_operation(self.client.as_ref(), operation, params).await?;
        let outcome = match decoder {
            None => Outcome::Raw(response),
            Some(Decoder::SingleItem) => Outcome::Single(decode_single(response)?),
            Some(Decoder::MultipleItems) => Outcome::Many(decode_many(response)?),
            Some(Decoder::BatchGetItems) => Outcome::BatchGet(decode_batch_get(response)?),
            Some(Decoder::BatchWriteItems) => Outcome::BatchWrite(decode_batch_write(response)?),
        };
        Ok(outcome)
    }
}

fn total(collection: &ItemCollection) -> usize {
    collection
        .meta
        .count
        .and_then(|count| usize::try_from(count).ok())
        .unwrap_or(collection.len())
}
