use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a004_tool::{Tool, ToolAction, ToolDto};
use contracts::system::access::Page;
use serde_json::json;

use super::parse_id;
use crate::domain::a004_tool;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/tool
pub async fn list_all(access: CurrentAccess) -> Result<Json<Vec<Tool>>, StatusCode> {
    access.require_view(Page::Tools)?;
    Ok(Json(a004_tool::service::list_all().await?))
}

/// GET /api/tool/mine
pub async fn list_mine(access: CurrentAccess) -> Result<Json<Vec<Tool>>, StatusCode> {
    access.require_view(Page::Tools)?;
    Ok(Json(
        a004_tool::service::list_assigned_to(&access.0.user_id).await?,
    ))
}

/// GET /api/tool/:id
pub async fn get_by_id(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Tool>, StatusCode> {
    access.require_view(Page::Tools)?;
    let uuid = parse_id(&id)?;
    a004_tool::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/tool
pub async fn upsert(
    access: CurrentAccess,
    Json(dto): Json<ToolDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    access.require_edit(Page::Tools)?;
    let id = match dto.id.clone() {
        Some(id) => {
            a004_tool::service::update(dto).await?;
            id
        }
        None => a004_tool::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// POST /api/tool/:id/action
///
/// Body: `{"action": "assign", "to": "<user id>"}`, `{"action": "return"}`, ...
pub async fn apply_action(
    access: CurrentAccess,
    Path(id): Path<String>,
    Json(action): Json<ToolAction>,
) -> Result<Json<Tool>, StatusCode> {
    access.require_view(Page::Tools)?;
    let uuid = parse_id(&id)?;
    let tool = a004_tool::service::apply_action(uuid, action, &access.0).await?;
    Ok(Json(tool))
}

/// DELETE /api/tool/:id
pub async fn delete(access: CurrentAccess, Path(id): Path<String>) -> Result<(), StatusCode> {
    access.require_edit(Page::Tools)?;
    let uuid = parse_id(&id)?;
    match a004_tool::service::delete(uuid).await? {
        true => Ok(()),
        false => Err(StatusCode::NOT_FOUND),
    }
}
