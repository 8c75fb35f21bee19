//! Expression attribute name/value interning.
//!
//! DynamoDB expressions never carry attribute names or literals inline; they
//! reference `#n` name placeholders and `:n` value placeholders declared in
//! `ExpressionAttributeNames` / `ExpressionAttributeValues`. One
//! [`PlaceholderTable`] per request hands out those keys, reusing the key of a
//! column or value that was interned before, so all three expression slots
//! and the projection draw from the same namespace.

use std::sync::Arc;

use dynaquery_model::codec::marshal;
use dynaquery_model::{AttributeMap, OrderedMap, Value};
use parking_lot::{Mutex, MutexGuard};

/// Prefix of attribute name placeholders.
pub const NAME_PREFIX: char = '#';
/// Prefix of attribute value placeholders.
pub const VALUE_PREFIX: char = ':';

/// Monotonic prefixed key generator: `#1`, `#2`, ...
///
/// Starts at 1 and never repeats a key.
#[derive(Debug, Clone)]
pub struct KeySequence {
    prefix: char,
    next: u32,
}

impl KeySequence {
    /// A new sequence emitting `{prefix}1` first.
    #[must_use]
    pub fn new(prefix: char) -> Self {
        Self { prefix, next: 1 }
    }

    /// Returns the next key and advances.
    pub fn next_key(&mut self) -> String {
        let key = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        key
    }
}

/// Interned names and values of one request.
#[derive(Debug, Clone)]
pub struct PlaceholderTable {
    names: OrderedMap<String>,
    values: OrderedMap<Value>,
    name_keys: KeySequence,
    value_keys: KeySequence,
}

impl Default for PlaceholderTable {
    fn default() -> Self {
        Self {
            names: OrderedMap::new(),
            values: OrderedMap::new(),
            name_keys: KeySequence::new(NAME_PREFIX),
            value_keys: KeySequence::new(VALUE_PREFIX),
        }
    }
}

impl PlaceholderTable {
    /// Returns the name placeholder of `column`, declaring it on first use.
    pub fn intern_name(&mut self, column: &str) -> String {
        if let Some((key, _)) = self.names.iter().find(|(_, c)| *c == column) {
            return key.to_owned();
        }
        let key = self.name_keys.next_key();
        self.names.insert(key.clone(), column.to_owned());
        key
    }

    /// Returns the value placeholder of `value`, declaring it on first use.
    ///
    /// Values match by type and content: the number `1` and the string `"1"`
    /// get different keys.
    pub fn intern_value(&mut self, value: Value) -> String {
        if let Some((key, _)) = self.values.iter().find(|(_, v)| **v == value) {
            return key.to_owned();
        }
        let key = self.value_keys.next_key();
        self.values.insert(key.clone(), value);
        key
    }

    /// Returns `true` if any name was interned.
    #[must_use]
    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    /// Returns `true` if any value was interned.
    #[must_use]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Returns `true` if `key` is a declared name placeholder.
    #[must_use]
    pub fn has_name_key(&self, key: &str) -> bool {
        self.names.contains_key(key)
    }

    /// Returns `true` if `key` is a declared value placeholder.
    #[must_use]
    pub fn has_value_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns `true` if `column` has been interned as a name.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.names.values().any(|c| c == column)
    }

    /// `ExpressionAttributeNames`.
    #[must_use]
    pub fn render_names(&self) -> OrderedMap<String> {
        self.names.clone()
    }

    /// `ExpressionAttributeValues`, marshaled to wire form.
    #[must_use]
    pub fn render_values(&self) -> AttributeMap {
        self.values.iter().map(|(k, v)| (k, marshal(v))).collect()
    }
}

/// Handle to the placeholder table shared by a request and its slots.
///
/// Cloning the handle shares the table; it never copies it.
#[derive(Debug, Clone, Default)]
pub struct SharedPlaceholders(Arc<Mutex<PlaceholderTable>>);

impl SharedPlaceholders {
    /// A fresh, empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`PlaceholderTable::intern_name`].
    pub fn intern_name(&self, column: &str) -> String {
        self.0.lock().intern_name(column)
    }

    /// See [`PlaceholderTable::intern_value`].
    pub fn intern_value(&self, value: impl Into<Value>) -> String {
        self.0.lock().intern_value(value.into())
    }

    /// Lock the table for rendering.
    pub fn lock(&self) -> MutexGuard<'_, PlaceholderTable> {
        self.0.lock()
    }

    /// Returns `true` if both handles point at the same table.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
