use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::error::{ApiError, ErrorResponse};
use crate::fetch::{build_client, fetch_html};
use crate::preview::{extract_preview, fetch_preview, Preview};
use crate::report::{self, Metadata, Report, ReviewOrigin};
use crate::reviews::ReviewCollector;

pub struct AppState {
    pub config: AppConfig,
    pub client: reqwest::Client,
    pub collector: ReviewCollector,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = build_client(config.fetch_timeout)?;
        let collector =
            ReviewCollector::new(client.clone(), config.review_limit, config.use_sample_reviews);
        Ok(Self {
            config,
            client,
            collector,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub product_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewsRequest {
    #[serde(default)]
    pub reviews: Vec<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body value first, query string second; blank values count as missing.
fn product_url(query: ProductRequest, body: Option<Json<ProductRequest>>) -> Result<String, ApiError> {
    let clean = |u: Option<String>| u.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    clean(body.and_then(|Json(b)| b.product_url))
        .or_else(|| clean(query.product_url))
        .ok_or(ApiError::MissingUrl)
}

/// Runs the pipeline off the async workers.
async fn run_pipeline(
    reviews: Vec<String>,
    metadata: Metadata,
    url: String,
    origin: ReviewOrigin,
    state: &AppState,
) -> Result<Report, ApiError> {
    let options = state.config.analysis_options();
    let report = tokio::task::spawn_blocking(move || {
        report::analyze(&reviews, metadata, &url, origin, options)
    })
    .await?;

    info!(
        "📊 Report for '{}': {} reviews, tone {}, rating {}",
        report.url, report.review_count, report.tone, report.rating
    );
    Ok(report)
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
    tag = "analysis"
)]
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Review analysis API is running".to_string(),
    })
}

/// Fetch title, description and image for a product page
#[utoipa::path(
    post,
    path = "/preview",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Page preview", body = Preview),
        (status = 400, description = "Missing or unreachable URL", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductRequest>,
    body: Option<Json<ProductRequest>>,
) -> Result<Json<Preview>, ApiError> {
    let url = product_url(query, body)?;
    let preview = fetch_preview(&state.client, &url).await.map_err(|e| {
        warn!("⚠️ Preview fetch failed for {}: {:#}", url, e);
        ApiError::FetchFailed(e.to_string())
    })?;
    Ok(Json(preview))
}

/// Collect reviews for a product URL and analyze them
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Sentiment report", body = Report),
        (status = 400, description = "Missing URL", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductRequest>,
    body: Option<Json<ProductRequest>>,
) -> Result<Json<Report>, ApiError> {
    let url = product_url(query, body)?;
    info!("🔍 Analyzing reviews for {}", url);

    let page = fetch_html(&state.client, &url).await;
    let report = analyze_page(&state, url, page).await?;
    Ok(Json(report))
}

/// Metadata and reviews from one fetch of the product page. A failed fetch
/// leaves the metadata empty and lets the review sources try on their own.
async fn analyze_page(
    state: &AppState,
    url: String,
    page: anyhow::Result<String>,
) -> Result<Report, ApiError> {
    let (metadata, page) = match page {
        Ok(html) => (Metadata::from(extract_preview(&html, &url)), Some(html)),
        Err(e) => {
            warn!("⚠️ Metadata unavailable for {}: {:#}", url, e);
            (Metadata::default(), None)
        }
    };

    let collected = state.collector.collect(&url, page.as_deref()).await;
    run_pipeline(collected.reviews, metadata, url, collected.origin, state).await
}

/// Analyze a caller-supplied list of reviews
#[utoipa::path(
    post,
    path = "/analyze/reviews",
    request_body = ReviewsRequest,
    responses((status = 200, description = "Sentiment report", body = Report)),
    tag = "analysis"
)]
pub async fn analyze_reviews(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReviewsRequest>,
) -> Result<Json<Report>, ApiError> {
    let report = run_pipeline(
        req.reviews,
        req.metadata.unwrap_or_default(),
        req.url.unwrap_or_default(),
        ReviewOrigin::Provided,
        &state,
    )
    .await?;
    Ok(Json(report))
}
