mod api;
mod charts;
mod chat;
mod config;
mod error;
mod ml;
mod pipeline;
mod responder;

use axum::Router;
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::ml::ModelHandles;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::analyze_posts,
        api::send_chat,
        api::get_chat_history,
        api::health
    ),
    components(
        schemas(
            api::AnalyzeRequest,
            api::AnalyzeResponse,
            api::ChatRequest,
            api::ChatResponse,
            api::ChatHistoryResponse,
            api::HealthResponse,
            crate::pipeline::PostRecord,
            crate::charts::Charts,
            crate::chat::ChatTurn,
            crate::chat::Speaker,
            crate::ml::LabelScore
        )
    ),
    tags(
        (name = "analysis", description = "Post sentiment, emotion and polarity"),
        (name = "chat", description = "Emotion-aware chatbot"),
        (name = "system", description = "Service status")
    )
)]
struct ApiDoc;

fn app(state: Arc<api::AppState>, static_dir: &str) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api::routes(state))
        .fallback_service(ServeDir::new(static_dir)) // Serve the single-page UI
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    // Models are loaded once here and shared read-only by every request.
    let models = ModelHandles::load(&config)?;
    let state = Arc::new(api::AppState::new(models));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, &config.static_dir)).await?;

    Ok(())
}
