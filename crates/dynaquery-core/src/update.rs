//! Update actions of an `UpdateItem` request.

use dynaquery_model::{Item, Value};

use crate::placeholder::SharedPlaceholders;

/// One update action; names and values are placeholder keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// `{name} = {value}`
    Set {
        /// Name key.
        name: String,
        /// Value key.
        value: String,
    },
    /// `{name} = {name} + {value}`
    Increment {
        /// Name key.
        name: String,
        /// Value key.
        value: String,
    },
    /// `{name} = {name} - {value}`
    Decrement {
        /// Name key.
        name: String,
        /// Value key.
        value: String,
    },
    /// `remove {name}`
    Remove {
        /// Name key.
        name: String,
    },
}

/// Update actions in call order.
#[derive(Debug, Clone, Default)]
pub struct UpdateActions {
    actions: Vec<UpdateAction>,
}

impl UpdateActions {
    /// Assign every attribute of `item`: null values remove the attribute,
    /// anything else sets it.
    pub fn assign(&mut self, placeholders: &SharedPlaceholders, item: &Item) {
        for (column, value) in item {
            let name = placeholders.intern_name(column);
            let action = if value.is_null() {
                UpdateAction::Remove { name }
            } else {
                UpdateAction::Set {
                    name,
                    value: placeholders.intern_value(value.clone()),
                }
            };
            self.actions.push(action);
        }
    }

    /// Add `amount` to `column`.
    pub fn increment(
        &mut self,
        placeholders: &SharedPlaceholders,
        column: &str,
        amount: impl Into<Value>,
    ) {
        let name = placeholders.intern_name(column);
        let value = placeholders.intern_value(amount);
        self.actions.push(UpdateAction::Increment { name, value });
    }

    /// Subtract `amount` from `column`.
    pub fn decrement(
        &mut self,
        placeholders: &SharedPlaceholders,
        column: &str,
        amount: impl Into<Value>,
    ) {
        let name = placeholders.intern_name(column);
        let value = placeholders.intern_value(amount);
        self.actions.push(UpdateAction::Decrement { name, value });
    }

    /// Returns `true` if there is nothing to update.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in call order.
    #[must_use]
    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }
}
