use axum::{http::StatusCode, Json};
use contracts::dashboards::d400_inventory_summary::InventorySummaryResponse;
use contracts::system::access::Page;

use crate::dashboards::d400_inventory_summary::service;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/d400/inventory_summary
pub async fn get_inventory_summary(
    access: CurrentAccess,
) -> Result<Json<InventorySummaryResponse>, StatusCode> {
    access.require_view(Page::Dashboard)?;
    match service::get_inventory_summary().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Failed to build inventory summary: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
