pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::extract::DefaultBodyLimit;
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::{ServeDir, ServeFile};

    system::logging::initialize()?;

    let config = shared::config::init_config()?;

    let db_path = shared::config::get_database_path(config);
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let store = shared::storage::init_store(config);
    tracing::info!("Uploads stored under {}", store.root().display());

    // Ensure admin user exists
    system::initialization::ensure_admin_user_exists().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let dist_dir = shared::config::resolve_path(&config.frontend.dist_dir);
    let spa = ServeDir::new(&dist_dir).fallback(ServeFile::new(dist_dir.join("index.html")));

    let app = routes::configure_routes()
        .nest_service("/media", ServeDir::new(store.root()))
        .fallback_service(spa)
        .layer(middleware::from_fn(system::middleware::page_guard::page_guard))
        .layer(DefaultBodyLimit::max(shared::storage::MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(cors)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {e}"))?;
    tracing::info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
