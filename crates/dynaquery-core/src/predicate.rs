//! Predicate trees for the filter, condition and key-condition slots.
//!
//! A [`PredicateBuilder`] accumulates [`Clause`]s in call order. Columns and
//! values are interned into the request's shared placeholder table as soon as
//! a clause is added, so a clause only ever holds placeholder keys. Nothing is
//! validated eagerly: a clause that cannot be rendered is kept as
//! [`Predicate::Unsupported`] and reported when the slot is compiled.

use std::fmt;

use dynaquery_model::Value;

use crate::placeholder::SharedPlaceholders;

/// How a clause joins the clause before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connector {
    /// `and`
    #[default]
    And,
    /// `or`
    Or,
}

impl Connector {
    /// Expression keyword.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators DynamoDB expressions support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparison {
    /// Expression token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Parse an operator token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            "<>" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition functions usable as a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateFunction {
    /// `attribute_exists(path)`
    AttributeExists,
    /// `attribute_not_exists(path)`
    AttributeNotExists,
    /// `attribute_type(path, type)`
    AttributeType,
    /// `begins_with(path, prefix)`
    BeginsWith,
    /// `contains(path, operand)`
    Contains,
    /// `size(path) = operand`
    Size,
}

impl PredicateFunction {
    /// Function name as written in an expression.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttributeExists => "attribute_exists",
            Self::AttributeNotExists => "attribute_not_exists",
            Self::AttributeType => "attribute_type",
            Self::BeginsWith => "begins_with",
            Self::Contains => "contains",
            Self::Size => "size",
        }
    }

    /// Parse a function token (case-insensitive).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "attribute_exists" => Some(Self::AttributeExists),
            "attribute_not_exists" => Some(Self::AttributeNotExists),
            "attribute_type" => Some(Self::AttributeType),
            "begins_with" => Some(Self::BeginsWith),
            "contains" => Some(Self::Contains),
            "size" => Some(Self::Size),
            _ => None,
        }
    }

    /// Number of value operands after the attribute path.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::AttributeExists | Self::AttributeNotExists => 0,
            Self::AttributeType | Self::BeginsWith | Self::Contains | Self::Size => 1,
        }
    }
}

impl fmt::Display for PredicateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator position and operand of a `where` call.
///
/// Built through `From`:
/// - `("<", 10)` is operator plus value,
/// - a bare value (`5`, `true`, `Value::Null`) is an equality,
/// - a bare token (`"attribute_exists"`) is a zero-operand function, and any
///   string that is not an operator or function name is an equality against
///   that string (`"Amazon DynamoDB"`).
#[derive(Debug, Clone, PartialEq)]
pub struct WhereArgs {
    operator: Option<String>,
    value: Option<Value>,
}

impl WhereArgs {
    /// Explicit operator and value.
    pub fn new(operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            operator: Some(operator.into()),
            value: Some(value.into()),
        }
    }

    /// Equality against `value`.
    pub fn equals(value: impl Into<Value>) -> Self {
        Self {
            operator: None,
            value: Some(value.into()),
        }
    }

    /// Operator or function token with no value.
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            operator: Some(token.into()),
            value: None,
        }
    }
}

impl From<&str> for WhereArgs {
    fn from(token: &str) -> Self {
        Self::token(token)
    }
}

impl From<String> for WhereArgs {
    fn from(token: String) -> Self {
        Self::token(token)
    }
}

impl From<Value> for WhereArgs {
    fn from(value: Value) -> Self {
        Self::equals(value)
    }
}

impl<V: Into<Value>> From<(&str, V)> for WhereArgs {
    fn from((operator, value): (&str, V)) -> Self {
        Self::new(operator, value)
    }
}

macro_rules! impl_where_args_equals {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for WhereArgs {
                fn from(value: $ty) -> Self {
                    Self::equals(value)
                }
            }
        )*
    };
}

impl_where_args_equals!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// One predicate; columns and values are placeholder keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `{column} {operator} {value}`
    Basic {
        /// Name key.
        column: String,
        /// Comparison.
        operator: Comparison,
        /// Value key.
        value: String,
    },
    /// `{function}({column}[, {value}])`, or `size({column}) {op} {value}`.
    Function {
        /// Function.
        function: PredicateFunction,
        /// Name key.
        column: String,
        /// Value key, present iff the function takes an operand.
        value: Option<String>,
        /// Comparison applied to `size`; `=` unless set through `where_size`.
        comparison: Comparison,
    },
    /// `({column} between {low} and {high})`
    Between {
        /// Name key.
        column: String,
        /// Lower bound key.
        low: String,
        /// Upper bound key.
        high: String,
        /// Rendered as `not (...)`.
        negated: bool,
    },
    /// `({column} in ({v1}, {v2}, ...))`
    In {
        /// Name key.
        column: String,
        /// Candidate keys.
        values: Vec<String>,
        /// Rendered as `not (...)`.
        negated: bool,
    },
    /// A parenthesized group.
    Nested(Vec<Clause>),
    /// A clause that cannot be rendered.
    Unsupported {
        /// The operator or function token as given.
        token: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A predicate and the connector joining it to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Joins this clause to the previous one; ignored on the first clause.
    pub connector: Connector,
    /// The predicate.
    pub predicate: Predicate,
}

/// Fluent accumulator of clauses for one expression slot.
#[derive(Debug, Clone)]
pub struct PredicateBuilder {
    placeholders: SharedPlaceholders,
    clauses: Vec<Clause>,
}

impl PredicateBuilder {
    /// An empty builder interning into `placeholders`.
    #[must_use]
    pub fn new(placeholders: SharedPlaceholders) -> Self {
        Self {
            placeholders,
            clauses: Vec::new(),
        }
    }

    /// The shared placeholder table.
    #[must_use]
    pub fn placeholders(&self) -> &SharedPlaceholders {
        &self.placeholders
    }

    /// Accumulated clauses in call order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns `true` if no clause was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Add a `where` clause joined by `connector`.
    pub fn add_where(
        &mut self,
        column: &str,
        args: impl Into<WhereArgs>,
        connector: Connector,
    ) -> &mut Self {
        let WhereArgs { operator, value } = args.into();
        let column = self.placeholders.intern_name(column);
        let value = value.map(|v| self.placeholders.intern_value(v));

        let predicate = match operator {
            None => Predicate::Basic {
                column,
                operator: Comparison::Eq,
                value: value.unwrap_or_else(|| self.placeholders.intern_value(Value::Null)),
            },
            Some(token) => self.resolve_token(column, token, value),
        };
        self.push(connector, predicate)
    }

    fn resolve_token(&self, column: String, token: String, value: Option<String>) -> Predicate {
        if let Some(operator) = Comparison::from_token(&token) {
            return match value {
                Some(value) => Predicate::Basic {
                    column,
                    operator,
                    value,
                },
                None => Predicate::Unsupported {
                    token,
                    reason: "comparison needs a value operand".to_owned(),
                },
            };
        }

        if let Some(function) = PredicateFunction::from_token(&token) {
            return match (function.arity(), value) {
                (0, None) => Predicate::Function {
                    function,
                    column,
                    value: None,
                    comparison: Comparison::Eq,
                },
                (1, Some(value)) => Predicate::Function {
                    function,
                    column,
                    value: Some(value),
                    comparison: Comparison::Eq,
                },
                (0, Some(_)) => Predicate::Unsupported {
                    token,
                    reason: "function takes no value operand".to_owned(),
                },
                _ => Predicate::Unsupported {
                    token,
                    reason: "function needs a value operand".to_owned(),
                },
            };
        }

        match value {
            // Short syntax: `where(column, value)` with a string value.
            None => Predicate::Basic {
                column,
                operator: Comparison::Eq,
                value: self.placeholders.intern_value(Value::String(token)),
            },
            Some(_) => Predicate::Unsupported {
                token,
                reason: "not a comparison operator or condition function".to_owned(),
            },
        }
    }

    /// `and {column} ...`
    pub fn where_(&mut self, column: &str, args: impl Into<WhereArgs>) -> &mut Self {
        self.add_where(column, args, Connector::And)
    }

    /// Alias of [`PredicateBuilder::where_`].
    pub fn and_where(&mut self, column: &str, args: impl Into<WhereArgs>) -> &mut Self {
        self.add_where(column, args, Connector::And)
    }

    /// `or {column} ...`
    pub fn or_where(&mut self, column: &str, args: impl Into<WhereArgs>) -> &mut Self {
        self.add_where(column, args, Connector::Or)
    }

    /// Add `size({column}) {operator} {value}`.
    pub fn add_size(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
        connector: Connector,
    ) -> &mut Self {
        let column = self.placeholders.intern_name(column);
        let value = self.placeholders.intern_value(value);
        let predicate = match Comparison::from_token(operator) {
            Some(comparison) => Predicate::Function {
                function: PredicateFunction::Size,
                column,
                value: Some(value),
                comparison,
            },
            None => Predicate::Unsupported {
                token: operator.to_owned(),
                reason: "size needs a comparison operator".to_owned(),
            },
        };
        self.push(connector, predicate)
    }

    /// `and size({column}) {operator} {value}`
    pub fn where_size(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_size(column, operator, value, Connector::And)
    }

    /// `or size({column}) {operator} {value}`
    pub fn or_where_size(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_size(column, operator, value, Connector::Or)
    }

    /// Add a set-membership clause.
    pub fn add_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
        connector: Connector,
        negated: bool,
    ) -> &mut Self {
        let column = self.placeholders.intern_name(column);
        let values = values
            .into_iter()
            .map(|v| self.placeholders.intern_value(v))
            .collect();
        self.push(
            connector,
            Predicate::In {
                column,
                values,
                negated,
            },
        )
    }

    /// `and ({column} in (...))`
    pub fn where_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_in(column, values, Connector::And, false)
    }

    /// `or ({column} in (...))`
    pub fn or_where_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_in(column, values, Connector::Or, false)
    }

    /// `and not ({column} in (...))`
    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_in(column, values, Connector::And, true)
    }

    /// Add a range clause.
    pub fn add_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
        connector: Connector,
        negated: bool,
    ) -> &mut Self {
        let column = self.placeholders.intern_name(column);
        let low = self.placeholders.intern_value(low);
        let high = self.placeholders.intern_value(high);
        self.push(
            connector,
            Predicate::Between {
                column,
                low,
                high,
                negated,
            },
        )
    }

    /// `and ({column} between {low} and {high})`
    pub fn where_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between(column, low, high, Connector::And, false)
    }

    /// `or ({column} between {low} and {high})`
    pub fn or_where_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between(column, low, high, Connector::Or, false)
    }

    /// `and not ({column} between {low} and {high})`
    pub fn where_not_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between(column, low, high, Connector::And, true)
    }

    /// Add a parenthesized group built by `build`.
    ///
    /// The group shares this builder's placeholder table. An empty group adds
    /// nothing.
    pub fn add_nested(
        &mut self,
        build: impl FnOnce(&mut PredicateBuilder),
        connector: Connector,
    ) -> &mut Self {
        let mut group = PredicateBuilder::new(self.placeholders.clone());
        build(&mut group);
        if group.is_empty() {
            return self;
        }
        self.push(connector, Predicate::Nested(group.clauses))
    }

    /// `and (...)`
    pub fn where_nested(&mut self, build: impl FnOnce(&mut PredicateBuilder)) -> &mut Self {
        self.add_nested(build, Connector::And)
    }

    /// `or (...)`
    pub fn or_where_nested(&mut self, build: impl FnOnce(&mut PredicateBuilder)) -> &mut Self {
        self.add_nested(build, Connector::Or)
    }

    fn push(&mut self, connector: Connector, predicate: Predicate) -> &mut Self {
        self.clauses.push(Clause {
            connector,
            predicate,
        });
        self
    }
}
