//! Rendering of builder state into wire attributes.
//!
//! Every `compile_*` function owns a disjoint set of
//! [`RequestParams`](dynaquery_model::RequestParams)
//! fields. Renderers that intern (projection, conditions) must run before
//! [`Grammar::compile_placeholder_maps`] so the dumped tables are complete.

use dynaquery_model::codec::marshal_item;
use dynaquery_model::params::RequestItems;
use dynaquery_model::types::{KeysAndAttributes, ReturnValue, WriteRequest};
use dynaquery_model::{AttributeMap, Item, OrderedMap};

use crate::error::{QueryError, QueryResult};
use crate::placeholder::{PlaceholderTable, SharedPlaceholders};
use crate::predicate::{Clause, Predicate, PredicateBuilder, PredicateFunction};
use crate::update::{UpdateAction, UpdateActions};

/// One entry of a batch write.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRequest {
    /// Put the item.
    Put(Item),
    /// Delete the item with this key.
    Delete(Item),
}

/// Renderer bound to a connection's table prefix.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    table_prefix: String,
}

impl Grammar {
    /// A grammar prefixing every table name with `table_prefix`.
    pub fn new(table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
        }
    }

    /// `TableName`
    #[must_use]
    pub fn compile_table_name(&self, table: &str) -> String {
        format!("{}{table}", self.table_prefix)
    }

    /// `IndexName`; an empty name renders nothing.
    #[must_use]
    pub fn compile_index_name(index: Option<&str>) -> Option<String> {
        index.filter(|i| !i.is_empty()).map(str::to_owned)
    }

    /// `Key`
    #[must_use]
    pub fn compile_key(key: &Item) -> AttributeMap {
        marshal_item(key)
    }

    /// `Item`
    #[must_use]
    pub fn compile_item(item: &Item) -> AttributeMap {
        marshal_item(item)
    }

    /// `UpdateExpression` and `ReturnValues`.
    ///
    /// Set actions render first, then removals: `set #1 = :1 remove #2`.
    pub fn compile_update(
        table: &PlaceholderTable,
        updates: &UpdateActions,
    ) -> QueryResult<Option<(String, ReturnValue)>> {
        let mut set = Vec::new();
        let mut remove = Vec::new();
        for action in updates.actions() {
            match action {
                UpdateAction::Set { name, value } => {
                    set.push(format!("{} = {}", name_ref(table, name)?, value_ref(table, value)?));
                }
                UpdateAction::Increment { name, value } => {
                    let name = name_ref(table, name)?;
                    set.push(format!("{name} = {name} + {}", value_ref(table, value)?));
                }
                UpdateAction::Decrement { name, value } => {
                    let name = name_ref(table, name)?;
                    set.push(format!("{name} = {name} - {}", value_ref(table, value)?));
                }
                UpdateAction::Remove { name } => remove.push(name_ref(table, name)?.to_owned()),
            }
        }

        let mut groups = Vec::with_capacity(2);
        if !set.is_empty() {
            groups.push(format!("set {}", set.join(", ")));
        }
        if !remove.is_empty() {
            groups.push(format!("remove {}", remove.join(", ")));
        }
        if groups.is_empty() {
            return Ok(None);
        }
        Ok(Some((groups.join(" "), ReturnValue::UpdatedNew)))
    }

    /// Render one slot; an empty slot renders nothing.
    pub fn compile_conditions(builder: &PredicateBuilder) -> QueryResult<Option<String>> {
        if builder.is_empty() {
            return Ok(None);
        }
        let table = builder.placeholders().lock();
        render_clauses(&table, builder.clauses()).map(Some)
    }

    /// `ProjectionExpression`; interns every column.
    pub fn compile_projection(
        placeholders: &SharedPlaceholders,
        columns: &[String],
    ) -> Option<String> {
        if columns.is_empty() {
            return None;
        }
        let keys: Vec<_> = columns
            .iter()
            .map(|c| placeholders.intern_name(c))
            .collect();
        Some(keys.join(", "))
    }

    /// `ConsistentRead`; only a strongly consistent read is sent.
    #[must_use]
    pub fn compile_consistent_read(consistent_read: Option<bool>) -> Option<bool> {
        consistent_read.filter(|c| *c)
    }

    /// `RequestItems` of a `BatchGetItem` against one table.
    ///
    /// Projection and names travel inside the table's entry; batch requests
    /// carry no top-level expression attributes.
    #[must_use]
    pub fn compile_batch_get(
        &self,
        table: &str,
        keys: &[Item],
        projection: Option<String>,
        names: OrderedMap<String>,
        consistent_read: Option<bool>,
    ) -> RequestItems {
        let entry = KeysAndAttributes {
            keys: keys.iter().map(marshal_item).collect(),
            projection_expression: projection,
            expression_attribute_names: names,
            consistent_read: Self::compile_consistent_read(consistent_read),
        };
        RequestItems::Get([(self.compile_table_name(table), entry)].into())
    }

    /// `RequestItems` of a `BatchWriteItem` against one table.
    #[must_use]
    pub fn compile_batch_write(&self, table: &str, requests: &[BatchRequest]) -> RequestItems {
        let requests = requests
            .iter()
            .map(|request| match request {
                BatchRequest::Put(item) => WriteRequest::put(marshal_item(item)),
                BatchRequest::Delete(key) => WriteRequest::delete(marshal_item(key)),
            })
            .collect();
        RequestItems::Write([(self.compile_table_name(table), requests)].into())
    }

    /// `ExpressionAttributeNames` and `ExpressionAttributeValues`; each is
    /// empty when nothing of its kind was interned.
    #[must_use]
    pub fn compile_placeholder_maps(table: &PlaceholderTable) -> (OrderedMap<String>, AttributeMap) {
        (table.render_names(), table.render_values())
    }
}

fn name_ref<'a>(table: &PlaceholderTable, key: &'a str) -> QueryResult<&'a str> {
    if table.has_name_key(key) {
        Ok(key)
    } else {
        Err(QueryError::DanglingPlaceholder { key: key.to_owned() })
    }
}

fn value_ref<'a>(table: &PlaceholderTable, key: &'a str) -> QueryResult<&'a str> {
    if table.has_value_key(key) {
        Ok(key)
    } else {
        Err(QueryError::DanglingPlaceholder { key: key.to_owned() })
    }
}

fn render_clauses(table: &PlaceholderTable, clauses: &[Clause]) -> QueryResult<String> {
    let mut out = String::new();
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(clause.connector.as_str());
            out.push(' ');
        }
        out.push_str(&render_predicate(table, &clause.predicate)?);
    }
    Ok(out)
}

fn render_predicate(table: &PlaceholderTable, predicate: &Predicate) -> QueryResult<String> {
    match predicate {
        Predicate::Basic {
            column,
            operator,
            value,
        } => Ok(format!(
            "{} {operator} {}",
            name_ref(table, column)?,
            value_ref(table, value)?
        )),
        Predicate::Function {
            function,
            column,
            value,
            comparison,
        } => {
            let column = name_ref(table, column)?;
            match (function, value) {
                (PredicateFunction::Size, Some(value)) => Ok(format!(
                    "size({column}) {comparison} {}",
                    value_ref(table, value)?
                )),
                (_, Some(value)) => Ok(format!("{function}({column}, {})", value_ref(table, value)?)),
                (_, None) if function.arity() == 0 => Ok(format!("{function}({column})")),
                (_, None) => Err(QueryError::unsupported(
                    function.as_str(),
                    "function needs a value operand",
                )),
            }
        }
        Predicate::Between {
            column,
            low,
            high,
            negated,
        } => {
            let body = format!(
                "{} between {} and {}",
                name_ref(table, column)?,
                value_ref(table, low)?,
                value_ref(table, high)?
            );
            Ok(group(&body, *negated))
        }
        Predicate::In {
            column,
            values,
            negated,
        } => {
            if values.is_empty() {
                return Err(QueryError::unsupported("in", "needs at least one value"));
            }
            let values = values
                .iter()
                .map(|v| value_ref(table, v))
                .collect::<QueryResult<Vec<_>>>()?;
            let body = format!("{} in ({})", name_ref(table, column)?, values.join(", "));
            Ok(group(&body, *negated))
        }
        Predicate::Nested(clauses) => Ok(format!("({})", render_clauses(table, clauses)?)),
        Predicate::Unsupported { token, reason } => {
            Err(QueryError::unsupported(token.as_str(), reason.as_str()))
        }
    }
}

fn group(body: &str, negated: bool) -> String {
    if negated {
        format!("not ({body})")
    } else {
        format!("({body})")
    }
}
