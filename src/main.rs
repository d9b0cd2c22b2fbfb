use std::sync::Arc;

use outflo::{
    campaigns, db,
    llm::{GenConfig, Generate, GroqClient},
    messages, AppState,
};
use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&dotenv::var("DATABASE_URL").unwrap_or("sqlite://outflo.db?mode=rwc".to_owned()))
        .await
        .unwrap();
    db::init(&db_pool).await.unwrap();

    let api_key = dotenv::var("GROQ_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GROQ_API_KEY not set, every generation will use the fallback message");
    }
    let generator: Arc<dyn Generate> =
        Arc::new(GroqClient::new(&api_key, GenConfig::default()).unwrap());

    let app_state = AppState { db_pool, generator };
    let app = Router::new()
        .route("/", get(index))

        .nest("/campaigns", campaigns::router())
        .nest("/personalized-message", messages::router())

        .with_state(app_state)
        .layer(CorsLayer::permissive());

    let port = dotenv::var("PORT").unwrap_or("8080".to_owned());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await.unwrap();
    tracing::info!("listening on port {port}");
    axum::serve(listener, app).await.unwrap();
}

async fn index() -> &'static str {
    "Campaign API is running!"
}
