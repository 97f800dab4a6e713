use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a002_product::{Product, ProductDto};
use contracts::system::access::Page;
use serde_json::json;

use super::parse_id;
use crate::domain::a002_product;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/product
pub async fn list_all(access: CurrentAccess) -> Result<Json<Vec<Product>>, StatusCode> {
    access.require_view(Page::Products)?;
    Ok(Json(a002_product::service::list_all().await?))
}

/// GET /api/product/reorder
pub async fn list_to_reorder(access: CurrentAccess) -> Result<Json<Vec<Product>>, StatusCode> {
    access.require_view(Page::Products)?;
    Ok(Json(a002_product::service::list_to_reorder().await?))
}

/// GET /api/category/:id/products
pub async fn list_by_category(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    access.require_view(Page::Products)?;
    let uuid = parse_id(&id)?;
    Ok(Json(a002_product::service::list_by_category(uuid).await?))
}

/// GET /api/product/:id
pub async fn get_by_id(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Product>, StatusCode> {
    access.require_view(Page::Products)?;
    let uuid = parse_id(&id)?;
    a002_product::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/product
pub async fn upsert(
    access: CurrentAccess,
    Json(dto): Json<ProductDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    access.require_edit(Page::Products)?;
    let id = match dto.id.clone() {
        Some(id) => {
            a002_product::service::update(dto).await?;
            id
        }
        None => a002_product::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/product/:id
pub async fn delete(access: CurrentAccess, Path(id): Path<String>) -> Result<(), StatusCode> {
    access.require_edit(Page::Products)?;
    let uuid = parse_id(&id)?;
    match a002_product::service::delete(uuid).await? {
        true => Ok(()),
        false => Err(StatusCode::NOT_FOUND),
    }
}
