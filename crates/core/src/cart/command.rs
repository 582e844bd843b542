//! Cart Commands

use crate::cart::{LineItem, LineItemId};

/// Intent dispatched to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add an item, merging quantities with an existing entry of the same id.
    Add(LineItem),

    /// Remove an item; unknown ids are ignored.
    Remove(LineItemId),

    /// Overwrite the quantity of an item; quantities below 1 are ignored.
    SetQuantity {
        /// Target line item
        id: LineItemId,
        /// Requested quantity
        quantity: i64,
    },

    /// Empty the cart.
    Clear,
}

impl CartCommand {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::Add(_) => "add",
            CartCommand::Remove(_) => "remove",
            CartCommand::SetQuantity { .. } => "set_quantity",
            CartCommand::Clear => "clear",
        }
    }

    /// Line item the command targets, if any.
    pub fn target(&self) -> Option<&LineItemId> {
        match self {
            CartCommand::Add(item) => Some(item.id()),
            CartCommand::Remove(id) | CartCommand::SetQuantity { id, .. } => Some(id),
            CartCommand::Clear => None,
        }
    }
}
