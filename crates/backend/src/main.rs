pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;

use contracts::domain::a001_payroll::api::{
    LOGIN_PATH, PAYROLLS_PATH, SAMPLE_BUNDLE_PATH, SAMPLE_PATH, UPLOAD_PATH,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::extract::DefaultBodyLimit;
    use axum::http::{header, Method};
    use axum::middleware;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config);

    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    let conn = shared::data::db::get_connection()?;

    system::auth::jwt::initialize(conn, config.auth.token_lifetime_hours).await?;
    system::initialization::ensure_admin_user_exists(conn, &config.auth).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION]);

    // Everything below requires `Authorization: Bearer <token>`
    let admin = Router::new()
        .route(PAYROLLS_PATH, get(handlers::a001_payroll::list))
        .route(UPLOAD_PATH, post(handlers::a001_payroll::upload))
        .route(SAMPLE_PATH, get(handlers::a001_payroll::download_sample))
        .route(
            SAMPLE_BUNDLE_PATH,
            get(handlers::a001_payroll::download_sample_bundle),
        )
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth));

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(LOGIN_PATH, post(system::handlers::auth::login))
        .merge(admin)
        .fallback_service(ServeDir::new("dist"))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes()))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
