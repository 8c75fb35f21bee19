//! Declared primary key columns.

use dynaquery_model::Item;

use crate::error::{QueryError, QueryResult};

/// Partition key plus optional sort key of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Partition (hash) key column.
    pub partition: String,
    /// Sort (range) key column.
    pub sort: Option<String>,
}

impl KeySchema {
    /// A partition-key-only schema.
    pub fn partition(column: impl Into<String>) -> Self {
        Self {
            partition: column.into(),
            sort: None,
        }
    }

    /// A composite schema.
    pub fn composite(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }

    /// Key columns, partition first.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition.as_str()).chain(self.sort.as_deref())
    }

    /// Extract the key attributes of `item`.
    ///
    /// Fails with [`QueryError::MissingKey`] naming every key column that is
    /// absent, null or an empty string.
    pub fn key_of(&self, item: &Item) -> QueryResult<Item> {
        let mut key = Item::with_capacity(2);
        let mut missing = Vec::new();
        for column in self.columns() {
            match item.get(column) {
                Some(value) if !value.is_blank() => {
                    key.insert(column, value.clone());
                }
                _ => missing.push(column),
            }
        }
        if missing.is_empty() {
            Ok(key)
        } else {
            Err(QueryError::MissingKey(format!(
                "no value for key attribute(s) {}",
                missing.join(", ")
            )))
        }
    }

    /// Check that `key` carries every key column.
    pub fn validate(&self, key: &Item) -> QueryResult<()> {
        self.key_of(key).map(|_| ())
    }
}
