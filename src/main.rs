use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emergency_server::config::Settings;
use emergency_server::db::Database;
use emergency_server::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env();

    let db = Arc::new(Database::connect(&settings.storage).await?);
    tracing::info!(backend = db.backend_name(), "storage ready");

    let app = handlers::router(db)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("emergency server listening on {}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
