mod api;
mod config;
mod error;
mod fetch;
mod highlights;
mod preview;
mod rating;
mod report;
mod reviews;
mod sentiment;
mod stats;
mod summarizer;

use axum::{
    routing::{get, post},
    Router,
};
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::home,
        api::preview,
        api::analyze,
        api::analyze_reviews
    ),
    components(
        schemas(
            api::MessageResponse,
            api::ProductRequest,
            api::ReviewsRequest,
            crate::error::ErrorResponse,
            crate::preview::Preview,
            crate::report::Report,
            crate::report::Metadata,
            crate::report::ReviewOrigin,
            crate::stats::SentimentBreakdown,
            crate::sentiment::Sentiment
        )
    ),
    tags(
        (name = "analysis", description = "Product Review Analysis API")
    )
)]
struct ApiDoc;

pub fn router(state: Arc<api::AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/review-analyzer-swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::home))
        .route("/preview", post(api::preview))
        .route("/analyze", post(api::analyze))
        .route("/analyze/reviews", post(api::analyze_reviews))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env();
    info!("Starting with {:?}", config);

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(api::AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/preview", "/analyze", "/analyze/reviews"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
