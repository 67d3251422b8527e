/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Mutations a store reports to its observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SetItem,
    UpdateItem,
    ClearItem,
    SetItems,
    AddItems,
    RemoveItems,
    BatchUpdate,
    Reset,
    Rollback, // Optimistic update or transaction restored the snapshot
    Hydrate,  // Items loaded from persistent storage
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SetItem => "set_item",
            Operation::UpdateItem => "update_item",
            Operation::ClearItem => "clear_item",
            Operation::SetItems => "set_items",
            Operation::AddItems => "add_items",
            Operation::RemoveItems => "remove_items",
            Operation::BatchUpdate => "batch_update",
            Operation::Reset => "reset",
            Operation::Rollback => "rollback",
            Operation::Hydrate => "hydrate",
        }
    }
}
