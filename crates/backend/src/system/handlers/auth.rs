use axum::{extract::Json, http::StatusCode};
use contracts::system::access::Page;
use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};

use crate::system::auth::extractor::{CurrentAccess, CurrentUser};
use crate::system::{auth::jwt, users::service as user_service};

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    let user = user_service::verify_credentials(&request.username, &request.password)
        .await
        .map_err(|e| {
            tracing::error!("Login failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("Rejected login for '{}'", request.username);
            StatusCode::UNAUTHORIZED
        })?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.role)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(LoginResponse {
        access_token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
        },
    }))
}

/// GET /api/system/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .filter(|u| u.is_active)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: user.role,
    }))
}

/// GET /api/system/pages
pub async fn visible_pages(CurrentAccess(ctx): CurrentAccess) -> Json<Vec<Page>> {
    Json(ctx.visible_pages())
}
