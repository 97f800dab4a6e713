use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::access::{AccessContext, Page};
use contracts::system::auth::TokenClaims;

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// The caller's authorization context, built from the validated token
pub struct CurrentAccess(pub AccessContext);

impl CurrentAccess {
    pub fn require_view(&self, page: Page) -> Result<(), StatusCode> {
        if self.0.can_view(page) {
            Ok(())
        } else {
            tracing::warn!("{} may not view {:?}", self.0.username, page);
            Err(StatusCode::FORBIDDEN)
        }
    }

    pub fn require_edit(&self, page: Page) -> Result<(), StatusCode> {
        if self.0.can_edit(page) {
            Ok(())
        } else {
            tracing::warn!("{} may not edit {:?}", self.0.username, page);
            Err(StatusCode::FORBIDDEN)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccess
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .map(|claims| CurrentAccess(AccessContext::from(claims)))
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
