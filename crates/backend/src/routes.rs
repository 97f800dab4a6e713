use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        // ========================================
        // SYSTEM USERS MANAGEMENT (admin only)
        // ========================================
        .merge(
            Router::new()
                .route(
                    "/api/system/users",
                    get(system::handlers::users::list).post(system::handlers::users::create),
                )
                .route_layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .merge(protected_routes())
}

/// Routes that need a valid access token; page rights are checked per handler
fn protected_routes() -> Router {
    Router::new()
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user),
        )
        .route(
            "/api/system/pages",
            get(system::handlers::auth::visible_pages),
        )
        // A001 Category handlers
        .route(
            "/api/category",
            get(handlers::a001_category::list_all).post(handlers::a001_category::upsert),
        )
        .route("/api/category/tree", get(handlers::a001_category::tree))
        .route(
            "/api/category/:id",
            get(handlers::a001_category::get_by_id).delete(handlers::a001_category::delete),
        )
        .route(
            "/api/category/:id/parent-candidates",
            get(handlers::a001_category::parent_candidates),
        )
        .route(
            "/api/category/:id/products",
            get(handlers::a002_product::list_by_category),
        )
        // A002 Product handlers
        .route(
            "/api/product",
            get(handlers::a002_product::list_all).post(handlers::a002_product::upsert),
        )
        .route(
            "/api/product/reorder",
            get(handlers::a002_product::list_to_reorder),
        )
        .route(
            "/api/product/:id",
            get(handlers::a002_product::get_by_id).delete(handlers::a002_product::delete),
        )
        // A003 Client handlers
        .route(
            "/api/client",
            get(handlers::a003_client::list_all).post(handlers::a003_client::upsert),
        )
        .route(
            "/api/client/:id",
            get(handlers::a003_client::get_by_id).delete(handlers::a003_client::delete),
        )
        // A004 Tool handlers
        .route(
            "/api/tool",
            get(handlers::a004_tool::list_all).post(handlers::a004_tool::upsert),
        )
        .route("/api/tool/mine", get(handlers::a004_tool::list_mine))
        .route(
            "/api/tool/:id",
            get(handlers::a004_tool::get_by_id).delete(handlers::a004_tool::delete),
        )
        .route(
            "/api/tool/:id/action",
            post(handlers::a004_tool::apply_action),
        )
        // A005 Task handlers
        .route(
            "/api/task",
            get(handlers::a005_task::list_all).post(handlers::a005_task::upsert),
        )
        .route("/api/task/tree", get(handlers::a005_task::tree))
        .route("/api/task/mine", get(handlers::a005_task::list_mine))
        .route(
            "/api/task/:id",
            get(handlers::a005_task::get_by_id).delete(handlers::a005_task::delete),
        )
        .route(
            "/api/task/:id/parent-candidates",
            get(handlers::a005_task::parent_candidates),
        )
        // D400 Inventory summary dashboard
        .route(
            "/api/d400/inventory_summary",
            get(handlers::d400_inventory_summary::get_inventory_summary),
        )
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use contracts::system::access::Role;
    use tower::ServiceExt;

    fn bearer(role: Role) -> String {
        let token = system::auth::jwt::generate_access_token("u-1", "tester", role).unwrap();
        format!("Bearer {}", token)
    }

    async fn send(req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = configure_routes().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_business_routes_require_token() {
        for path in ["/api/category", "/api/task/tree", "/api/d400/inventory_summary"] {
            let (status, _) = send(Request::get(path).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_malformed_token_is_unauthorized() {
        let req = Request::get("/api/tool")
            .header("Authorization", "Bearer nonsense")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_hidden_page_is_forbidden() {
        let req = Request::get("/api/client")
            .header("Authorization", bearer(Role::Technician))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_users_need_admin() {
        let req = Request::get("/api/system/users")
            .header("Authorization", bearer(Role::Manager))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_visible_pages_follow_role() {
        let req = Request::get("/api/system/pages")
            .header("Authorization", bearer(Role::Warehouse))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        let pages: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(pages, vec!["dashboard", "products", "categories", "tools"]);
    }
}
