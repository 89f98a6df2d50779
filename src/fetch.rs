use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::debug;

static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    ]
});

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_USER_AGENT)
}

/// Shared client for product page and review fetches. The User-Agent is
/// chosen per request, see [`page_request`].
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// GET with a freshly picked browser User-Agent.
fn page_request(client: &reqwest::Client, url: &str) -> reqwest::RequestBuilder {
    client
        .get(url)
        .header(reqwest::header::USER_AGENT, pick_user_agent())
        .header("Accept-Language", "en-US,en;q=0.9")
}

/// GETs `url` and returns the body, treating non-2xx statuses as errors.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = page_request(client, url)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?
        .error_for_status()?;

    let html = resp.text().await.context("failed to read response body")?;
    debug!("Fetched {} bytes from {}", html.len(), url);
    Ok(html)
}
