pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    use crate::shared::{config, data};

    system::tracing::initialize()?;

    let cfg = config::load_config()?;
    let db_path = config::get_database_path(&cfg)?;

    data::db::initialize_database(&db_path).await.map_err(|e| {
        tracing::error!("Failed to initialize database at {}: {}", db_path.display(), e);
        e
    })?;
    data::migration_runner::run_migrations(&db_path).await?;

    system::auth::jwt::configure(&cfg.auth);
    system::initialization::ensure_admin_user_exists(&cfg.auth).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = routes::configure_routes()
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!(
                "Port {} is already in use. Stop the other process or change [server] port in config.toml",
                cfg.server.port
            );
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Depot backend listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
