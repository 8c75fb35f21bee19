//! Plain, untyped-on-the-wire values used at the builder boundary.
//!
//! Callers hand [`Value`]s and [`Item`]s to the query builder; the codec turns
//! them into wire [`AttributeValue`](crate::AttributeValue)s. Equality is
//! structural and type-sensitive: `Value::from(1)` (number `"1"`) and
//! `Value::from("1")` (string `"1"`) are different values.

use std::fmt;

use crate::codec::{CodecError, is_number_literal};
use crate::ordered::OrderedMap;

/// A plain item: attribute name to value, in insertion order.
pub type Item = OrderedMap<Value>;

/// A plain attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent / null value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number, kept as its exact decimal literal.
    Number(String),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Bytes(bytes::Bytes),
    /// Ordered list.
    List(Vec<Value>),
    /// Nested map.
    Map(Item),
    /// Set of strings.
    StringSet(Vec<String>),
    /// Set of numbers.
    NumberSet(Vec<String>),
    /// Set of byte strings.
    BytesSet(Vec<bytes::Bytes>),
}

impl Value {
    /// Build a number from anything with a decimal `Display`, rejecting
    /// text the store would not accept as a number (`NaN`, `inf`).
    pub fn number(n: impl fmt::Display) -> Result<Self, CodecError> {
        let literal = n.to_string();
        if is_number_literal(&literal) {
            Ok(Self::Number(literal))
        } else {
            Err(CodecError::InvalidNumber(literal))
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` when the value cannot identify an item: null or an
    /// empty string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number literal if this is a [`Value::Number`].
    #[must_use]
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Parses a [`Value::Number`] as `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.parse().ok())
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested map if this is a [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&Item> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(n),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::List(l) => write!(f, "[{} items]", l.len()),
            Self::Map(m) => write!(f, "{{{} keys}}", m.len()),
            Self::StringSet(s) => write!(f, "SS{s:?}"),
            Self::NumberSet(s) => write!(f, "NS{s:?}"),
            Self::BytesSet(s) => write!(f, "BS[{} items]", s.len()),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(n.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// Floats have non-finite values with no wire form.
macro_rules! impl_try_from_float {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Value {
                type Error = CodecError;

                fn try_from(n: $ty) -> Result<Self, Self::Error> {
                    Self::number(n)
                }
            }
        )*
    };
}

impl_try_from_float!(f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bytes::Bytes> for Value {
    fn from(b: bytes::Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(bytes::Bytes::from(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Self::List(l)
    }
}

impl From<Item> for Value {
    fn from(m: Item) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// JSON numbers keep their literal text, objects keep document order.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.to_string()),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(a) => Self::List(a.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(o) => {
                Self::Map(o.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Build an [`Item`] from `name => value` pairs.
///
/// ```
/// use dynaquery_model::{item, Value};
///
/// let item = item! { "Id" => 101, "Name" => "dynaquery", "Deleted" => Value::Null };
/// assert_eq!(item.len(), 3);
/// assert_eq!(item.get("Id"), Some(&Value::from(101)));
/// ```
#[macro_export]
macro_rules! item {
    () => {
        $crate::Item::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut item = $crate::Item::new();
        $(
            item.insert($name, $crate::Value::from($value));
        )+
        item
    }};
}
