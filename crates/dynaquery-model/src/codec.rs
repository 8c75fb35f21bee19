//! Conversion between plain [`Value`]s and wire [`AttributeValue`]s.
//!
//! Marshaling is total: every plain value has exactly one wire form.
//! Unmarshaling validates what the store sent back and reports a
//! [`CodecError`] for anything that does not fit the plain model.

use crate::attribute_value::{AttributeMap, AttributeValue};
use crate::value::{Item, Value};

/// Errors raised while decoding wire values or response bodies.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A number attribute whose text is not a decimal literal.
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
    /// A response body that does not match the expected wire shape,
    /// including unknown attribute value type tags.
    #[error("malformed {shape} response: {source}")]
    MalformedResponse {
        /// Name of the expected response shape.
        shape: &'static str,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A decoded item rejected by a caller-provided conversion.
    #[error("cannot convert item: {0}")]
    Conversion(String),
}

/// Marshal a plain value to its wire form.
#[must_use]
pub fn marshal(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.clone()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Bytes(b) => AttributeValue::B(b.clone()),
        Value::List(l) => AttributeValue::L(l.iter().map(marshal).collect()),
        Value::Map(m) => AttributeValue::M(marshal_item(m)),
        Value::StringSet(s) => AttributeValue::Ss(s.clone()),
        Value::NumberSet(s) => AttributeValue::Ns(s.clone()),
        Value::BytesSet(s) => AttributeValue::Bs(s.clone()),
    }
}

/// Marshal every attribute of a plain item, keeping attribute order.
#[must_use]
pub fn marshal_item(item: &Item) -> AttributeMap {
    item.iter().map(|(k, v)| (k, marshal(v))).collect()
}

/// Unmarshal a wire value into a plain value.
pub fn unmarshal(value: AttributeValue) -> Result<Value, CodecError> {
    Ok(match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::N(n) => Value::Number(checked_number(n)?),
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::B(b) => Value::Bytes(b),
        AttributeValue::L(l) => Value::List(l.into_iter().map(unmarshal).collect::<Result<_, _>>()?),
        AttributeValue::M(m) => Value::Map(unmarshal_item(m)?),
        AttributeValue::Ss(s) => Value::StringSet(s),
        AttributeValue::Ns(s) => Value::NumberSet(
            s.into_iter()
                .map(checked_number)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Bs(s) => Value::BytesSet(s),
    })
}

/// Unmarshal a wire attribute map, keeping attribute order.
pub fn unmarshal_item(map: AttributeMap) -> Result<Item, CodecError> {
    map.try_map_values(unmarshal)
}

fn checked_number(n: String) -> Result<String, CodecError> {
    if is_number_literal(&n) {
        Ok(n)
    } else {
        Err(CodecError::InvalidNumber(n))
    }
}

/// Returns `true` for decimal literals DynamoDB accepts as numbers:
/// optional sign, digits with at most one decimal point, optional exponent.
#[must_use]
pub fn is_number_literal(s: &str) -> bool {
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    let digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match frac_part {
        Some(frac) => {
            (!int_part.is_empty() || !frac.is_empty()) && digits(int_part) && digits(frac)
        }
        None => !int_part.is_empty() && digits(int_part),
    };

    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['-', '+']).unwrap_or(e);
        !e.is_empty() && digits(e)
    });

    mantissa_ok && exponent_ok
}
