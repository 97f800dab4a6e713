use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a003_client::{Client, ClientDto};
use contracts::system::access::Page;
use serde_json::json;

use super::parse_id;
use crate::domain::a003_client;
use crate::system::auth::extractor::CurrentAccess;

/// GET /api/client
pub async fn list_all(access: CurrentAccess) -> Result<Json<Vec<Client>>, StatusCode> {
    access.require_view(Page::Clients)?;
    Ok(Json(a003_client::service::list_all().await?))
}

/// GET /api/client/:id
pub async fn get_by_id(
    access: CurrentAccess,
    Path(id): Path<String>,
) -> Result<Json<Client>, StatusCode> {
    access.require_view(Page::Clients)?;
    let uuid = parse_id(&id)?;
    a003_client::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/client
pub async fn upsert(
    access: CurrentAccess,
    Json(dto): Json<ClientDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    access.require_edit(Page::Clients)?;
    let id = match dto.id.clone() {
        Some(id) => {
            a003_client::service::update(dto).await?;
            id
        }
        None => a003_client::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/client/:id
pub async fn delete(access: CurrentAccess, Path(id): Path<String>) -> Result<(), StatusCode> {
    access.require_edit(Page::Clients)?;
    let uuid = parse_id(&id)?;
    match a003_client::service::delete(uuid).await? {
        true => Ok(()),
        false => Err(StatusCode::NOT_FOUND),
    }
}
