use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_category::{Category, CategoryDto};
use contracts::shared::hierarchy::HierarchyNode;
use contracts::system::access::Page;
use serde_json::json;

use super::parse_id;
use crate::domain::a001_category;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/category
pub async fn list_all(access: CurrentAccess) -> Result<Json<Vec<Category>>, StatusCode> {
    access.require_view(Page::Categories)?;
    let items = a001_category::service::list_all().await?;
    Ok(Json(items))
}

/// GET /api/category/tree
pub async fn tree(access: CurrentAccess) -> Result<Json<Vec<HierarchyNode<Category>>>, StatusCode> {
    access.require_view(Page::Categories)?;
    let roots = a001_category::service::tree().await?;
    Ok(Json(roots))
}

/// GET /api/category/:id
pub async fn get_by_id(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Category>, StatusCode> {
    access.require_view(Page::Categories)?;
    let uuid = parse_id(&id)?;
    a001_category::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/category/:id/parent-candidates
pub async fn parent_candidates(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Vec<Category>>, StatusCode> {
    access.require_edit(Page::Categories)?;
    let uuid = parse_id(&id)?;
    let items = a001_category::service::parent_candidates(uuid).await?;
    Ok(Json(items))
}

/// POST /api/category
pub async fn upsert(
    access: CurrentAccess,
    Json(dto): Json<CategoryDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    access.require_edit(Page::Categories)?;
    let id = match dto.id.clone() {
        Some(id) => {
            a001_category::service::update(dto).await?;
            id
        }
        None => a001_category::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/category/:id
pub async fn delete(access: CurrentAccess, Path(id): Path<String>) -> Result<(), StatusCode> {
    access.require_edit(Page::Categories)?;
    let uuid = parse_id(&id)?;
    match a001_category::service::delete(uuid).await? {
        true => Ok(()),
        false => Err(StatusCode::NOT_FOUND),
    }
}
