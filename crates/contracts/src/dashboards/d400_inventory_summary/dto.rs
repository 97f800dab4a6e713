use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for the inventory summary dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySummaryResponse {
    /// Tool counts keyed by status ("available", "in_use", ...)
    pub tools_by_status: BTreeMap<String, i64>,
    /// Task counts keyed by status ("todo", "done", ...)
    pub tasks_by_status: BTreeMap<String, i64>,
    /// Products at or below their reorder level
    pub products_to_reorder: i64,
    pub totals: InventoryTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryTotals {
    pub clients: i64,
    pub categories: i64,
    pub products: i64,
    pub tools: i64,
    pub tasks: i64,
}

/// Single (status, count) pair as returned by the aggregation queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
