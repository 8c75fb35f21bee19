//! Shorthand method table.
//!
//! Every slot is reachable through six shorthand names (`filter`,
//! `orFilter`, `filterIn`, `orFilterIn`, `filterBetween`, `orFilterBetween`,
//! and the same for `condition` and `keyCondition`). The table below lists
//! all eighteen; anything else is an undefined method.

use std::fmt;

use dynaquery_model::Value;

use crate::error::{QueryError, QueryResult};
use crate::predicate::{Connector, PredicateBuilder, WhereArgs};

/// The three expression slots of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `FilterExpression`
    Filter,
    /// `ConditionExpression`
    Condition,
    /// `KeyConditionExpression`
    KeyCondition,
}

impl Slot {
    /// All slots, in compile order.
    pub const ALL: [Slot; 3] = [Slot::Filter, Slot::Condition, Slot::KeyCondition];

    /// Wire attribute the slot renders into.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Filter => "FilterExpression",
            Self::Condition => "ConditionExpression",
            Self::KeyCondition => "KeyConditionExpression",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Argument shape a shorthand method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `(column, operator?, value?)`
    Where,
    /// `(column, values[])`
    In,
    /// `(column, low, high)`
    Between,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Where => "where",
            Self::In => "in",
            Self::Between => "between",
        })
    }
}

/// Arguments of a dynamically named shorthand call.
#[derive(Debug, Clone, PartialEq)]
pub enum ShorthandArgs {
    /// For `filter`, `orCondition`, ...
    Where {
        /// Column name.
        column: String,
        /// Operator and value.
        args: WhereArgs,
    },
    /// For `filterIn`, `orKeyConditionIn`, ...
    In {
        /// Column name.
        column: String,
        /// Candidate values.
        values: Vec<Value>,
    },
    /// For `conditionBetween`, ...
    Between {
        /// Column name.
        column: String,
        /// Lower bound.
        low: Value,
        /// Upper bound.
        high: Value,
    },
}

impl ShorthandArgs {
    /// `(column, operator?, value?)` arguments.
    pub fn where_(column: impl Into<String>, args: impl Into<WhereArgs>) -> Self {
        Self::Where {
            column: column.into(),
            args: args.into(),
        }
    }

    /// `(column, values[])` arguments.
    pub fn in_<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `(column, low, high)` arguments.
    pub fn between(
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::Between {
            column: column.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Shape of these arguments.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Where { .. } => Shape::Where,
            Self::In { .. } => Shape::In,
            Self::Between { .. } => Shape::Between,
        }
    }
}

/// One row of the shorthand table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorthandMethod {
    /// Method name as called.
    pub name: &'static str,
    /// Slot the clause lands in.
    pub slot: Slot,
    /// Connector of the clause.
    pub connector: Connector,
    /// Accepted argument shape.
    pub shape: Shape,
}

const fn method(
    name: &'static str,
    slot: Slot,
    connector: Connector,
    shape: Shape,
) -> ShorthandMethod {
    ShorthandMethod {
        name,
        slot,
        connector,
        shape,
    }
}

/// Every shorthand method.
pub static SHORTHAND_METHODS: [ShorthandMethod; 18] = [
    method("filter", Slot::Filter, Connector::And, Shape::Where),
    method("orFilter", Slot::Filter, Connector::Or, Shape::Where),
    method("filterIn", Slot::Filter, Connector::And, Shape::In),
    method("orFilterIn", Slot::Filter, Connector::Or, Shape::In),
    method("filterBetween", Slot::Filter, Connector::And, Shape::Between),
    method("orFilterBetween", Slot::Filter, Connector::Or, Shape::Between),
    method("condition", Slot::Condition, Connector::And, Shape::Where),
    method("orCondition", Slot::Condition, Connector::Or, Shape::Where),
    method("conditionIn", Slot::Condition, Connector::And, Shape::In),
    method("orConditionIn", Slot::Condition, Connector::Or, Shape::In),
    method("conditionBetween", Slot::Condition, Connector::And, Shape::Between),
    method("orConditionBetween", Slot::Condition, Connector::Or, Shape::Between),
    method("keyCondition", Slot::KeyCondition, Connector::And, Shape::Where),
    method("orKeyCondition", Slot::KeyCondition, Connector::Or, Shape::Where),
    method("keyConditionIn", Slot::KeyCondition, Connector::And, Shape::In),
    method("orKeyConditionIn", Slot::KeyCondition, Connector::Or, Shape::In),
    method("keyConditionBetween", Slot::KeyCondition, Connector::And, Shape::Between),
    method("orKeyConditionBetween", Slot::KeyCondition, Connector::Or, Shape::Between),
];

/// Look up a shorthand method by name.
pub fn resolve(name: &str) -> QueryResult<&'static ShorthandMethod> {
    SHORTHAND_METHODS
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| QueryError::undefined_method(name))
}

impl ShorthandMethod {
    /// Add the clause described by `args` to `builder`.
    ///
    /// Arguments of another shape than the method's are rejected as an
    /// undefined method, the way a call with the wrong signature would be.
    pub fn apply(&self, builder: &mut PredicateBuilder, args: ShorthandArgs) -> QueryResult<()> {
        if args.shape() != self.shape {
            return Err(QueryError::undefined_method(format!(
                "{}({} arguments)",
                self.name,
                args.shape()
            )));
        }
        match args {
            ShorthandArgs::Where { column, args } => {
                builder.add_where(&column, args, self.connector);
            }
            ShorthandArgs::In { column, values } => {
                builder.add_in(&column, values, self.connector, false);
            }
            ShorthandArgs::Between { column, low, high } => {
                builder.add_between(&column, low, high, self.connector, false);
            }
        }
        Ok(())
    }
}
