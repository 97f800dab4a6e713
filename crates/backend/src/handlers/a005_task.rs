use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a005_task::{Task, TaskDto};
use contracts::shared::hierarchy::HierarchyNode;
use contracts::system::access::Page;
use serde_json::json;

use super::parse_id;
use crate::domain::a005_task;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/task
pub async fn list_all(access: CurrentAccess) -> Result<Json<Vec<Task>>, StatusCode> {
    access.require_view(Page::Tasks)?;
    Ok(Json(a005_task::service::list_all().await?))
}

/// GET /api/task/mine
pub async fn list_mine(access: CurrentAccess) -> Result<Json<Vec<Task>>, StatusCode> {
    access.require_view(Page::Tasks)?;
    Ok(Json(
        a005_task::service::list_by_assignee(&access.0.user_id).await?,
    ))
}

/// GET /api/task/tree
pub async fn tree(access: CurrentAccess) -> Result<Json<Vec<HierarchyNode<Task>>>, StatusCode> {
    access.require_view(Page::Tasks)?;
    Ok(Json(a005_task::service::tree().await?))
}

/// GET /api/task/:id
pub async fn get_by_id(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Task>, StatusCode> {
    access.require_view(Page::Tasks)?;
    let uuid = parse_id(&id)?;
    a005_task::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/task/:id/parent-candidates
pub async fn parent_candidates(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, StatusCode> {
    access.require_edit(Page::Tasks)?;
    let uuid = parse_id(&id)?;
    Ok(Json(a005_task::service::parent_candidates(uuid).await?))
}

/// POST /api/task
pub async fn upsert(
    access: CurrentAccess,
    Json(dto): Json<TaskDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    access.require_edit(Page::Tasks)?;
    let id = match dto.id.clone() {
        Some(id) => {
            a005_task::service::update(dto).await?;
            id
        }
        None => a005_task::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/task/:id
pub async fn delete(access: CurrentAccess, Path(id): Path<String>) -> Result<(), StatusCode> {
    access.require_edit(Page::Tasks)?;
    let uuid = parse_id(&id)?;
    match a005_task::service::delete(uuid).await? {
        true => Ok(()),
        false => Err(StatusCode::NOT_FOUND),
    }
}
