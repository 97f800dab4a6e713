use anyhow::Result;
use contracts::dashboards::d400_inventory_summary::{
    InventorySummaryResponse, InventoryTotals, StatusCount,
};
use contracts::domain::a004_tool::ToolStatus;
use contracts::domain::a005_task::TaskStatus;
use std::collections::BTreeMap;

use super::repository;

/// Get inventory summary data
pub async fn get_inventory_summary() -> Result<InventorySummaryResponse> {
    let tools = repository::tools_by_status().await?;
    let tasks = repository::tasks_by_status().await?;
    let products_to_reorder = repository::products_to_reorder().await?;
    let totals = repository::totals().await?;

    Ok(build_summary(tools, tasks, products_to_reorder, totals))
}

/// Every known status is present in the result, with zero when absent
fn status_map<'a>(known: impl IntoIterator<Item = &'a str>, counts: Vec<StatusCount>) -> BTreeMap<String, i64> {
    let mut map: BTreeMap<String, i64> = known.into_iter().map(|s| (s.to_string(), 0)).collect();
    for row in counts {
        *map.entry(row.status).or_insert(0) += row.count;
    }
    map
}

fn build_summary(
    tools: Vec<StatusCount>,
    tasks: Vec<StatusCount>,
    products_to_reorder: i64,
    totals: InventoryTotals,
) -> InventorySummaryResponse {
    InventorySummaryResponse {
        tools_by_status: status_map(ToolStatus::ALL.iter().map(|s| s.as_str()), tools),
        tasks_by_status: status_map(TaskStatus::ALL.iter().map(|s| s.as_str()), tasks),
        products_to_reorder,
        totals,
    }
}
