use anyhow::Result;
use contracts::dashboards::d400_inventory_summary::{InventoryTotals, StatusCount};
use sea_orm::{DatabaseBackend, FromQueryResult, Statement};

use crate::shared::data::db::get_connection;

#[derive(Debug, FromQueryResult)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

async fn count_by_status(table: &str) -> Result<Vec<StatusCount>> {
    let sql = format!(
        "SELECT status, COUNT(*) AS count FROM {} WHERE is_deleted = 0 GROUP BY status ORDER BY status",
        table
    );
    let rows = StatusCountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql,
    ))
    .all(get_connection())
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| StatusCount {
            status: r.status,
            count: r.count,
        })
        .collect())
}

async fn count(sql: &str) -> Result<i64> {
    let row = CountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .one(get_connection())
    .await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

/// Live tools grouped by lifecycle status
pub async fn tools_by_status() -> Result<Vec<StatusCount>> {
    count_by_status("a004_tool").await
}

/// Live tasks grouped by status
pub async fn tasks_by_status() -> Result<Vec<StatusCount>> {
    count_by_status("a005_task").await
}

/// Live products whose quantity is at or below the reorder level
pub async fn products_to_reorder() -> Result<i64> {
    count("SELECT COUNT(*) AS count FROM a002_product WHERE is_deleted = 0 AND quantity <= reorder_level").await
}

pub async fn totals() -> Result<InventoryTotals> {
    Ok(InventoryTotals {
        clients: count("SELECT COUNT(*) AS count FROM a003_client WHERE is_deleted = 0").await?,
        categories: count("SELECT COUNT(*) AS count FROM a001_category WHERE is_deleted = 0").await?,
        products: count("SELECT COUNT(*) AS count FROM a002_product WHERE is_deleted = 0").await?,
        tools: count("SELECT COUNT(*) AS count FROM a004_tool WHERE is_deleted = 0").await?,
        tasks: count("SELECT COUNT(*) AS count FROM a005_task WHERE is_deleted = 0").await?,
    })
}
