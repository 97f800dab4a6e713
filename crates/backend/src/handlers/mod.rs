pub mod a001_category;
pub mod a002_product;
pub mod a003_client;
pub mod a004_tool;
pub mod a005_task;
pub mod d400_inventory_summary;

use axum::http::StatusCode;

/// Path ids are UUID strings; anything else is a bad request
pub(crate) fn parse_id(id: &str) -> Result<uuid::Uuid, StatusCode> {
    uuid::Uuid::parse_str(id).map_err(|_| StatusCode::BAD_REQUEST)
}
