use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use road_map_api::app::db;
use road_map_api::app::file_storage::FileStorage;
use road_map_api::infra::config;
use road_map_api::transport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- Database Initialization ---
    println!("> Connecting to database and ensuring schema...");
    let pool = db::connect().await?;
    println!("> Schema ready (roads, documents, crosswalks; PostGIS enabled).");

    // --- Local Document Storage ---
    let storage = FileStorage::new(
        config::storage_root(),
        config::max_file_size(),
        config::ALLOWED_MIME_TYPES,
    );
    storage.ensure_root().await?;
    println!("> Document storage at {:?}.", config::storage_root());

    let app_state = transport::http::AppState {
        pool: pool.clone(),
        storage: Arc::new(storage),
    };

    // --- API Server Initialization ---
    println!("> Starting API server...");
    let origins: Vec<HeaderValue> = config::cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("> API server listening on http://{bind_addr}");
    println!("> Swagger UI available at http://{bind_addr}/swagger-ui");
    println!("> Press Ctrl+C to shut down");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C)...");
            pool.close().await;
            println!("> Database pool closed. Goodbye.");
        }
    }

    Ok(())
}
