//! Review collection for product URLs.
//!
//! Each [`ReviewSource`] scrapes one site. The collector tries the sources
//! that handle a URL in order; when nothing can be collected the built-in
//! sample corpus stands in so the report is never empty.

use anyhow::{Context, Result};
use axum::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::fetch::fetch_html;
use crate::report::ReviewOrigin;

/// Fallback corpus used when no live review source succeeds.
pub static SAMPLE_REVIEWS: &[&str] = &[
    "The product quality is amazing and feels premium.",
    "Not worth the money, it stopped working in a week.",
    "Battery life is solid, and the camera is surprisingly good.",
    "Delivery was delayed and packaging was damaged.",
    "Excellent product, user interface is smooth and modern.",
    "Average build quality but good performance for the price.",
    "Terrible customer service, wouldn't recommend.",
];

// Flipkart rotates its class names; the first selector with matches wins.
const FLIPKART_REVIEW_SELECTORS: &[&str] = &["div.ZmyHeo", "div.t-ZTKy", "div._6K-7Co", "div.qwjRop"];

const AMAZON_REVIEW_SELECTORS: &[&str] = &["[data-hook='review-body'] span", "[data-hook='review-body']"];

/// Reads the `pid` query parameter of a Flipkart product URL.
pub fn extract_flipkart_pid(product_url: &str) -> Option<String> {
    let url = Url::parse(product_url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "pid")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Maps a product page (`/slug/p/itm..`) to its review listing
/// (`/slug/product-reviews/itm..?pid=..`).
pub fn flipkart_reviews_url(product_url: &str, pid: &str) -> Result<String> {
    let mut url = Url::parse(product_url).context("invalid Flipkart URL")?;
    let path = url.path().replacen("/p/", "/product-reviews/", 1);
    url.set_path(&path);
    url.set_query(None);
    url.query_pairs_mut().append_pair("pid", pid);
    Ok(url.to_string())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collects review texts using the first selector that matches anything.
pub fn parse_reviews(html: &str, selectors: &[&str], limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let found: Vec<String> = document
            .select(&selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .take(limit)
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Reviews for one product plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedReviews {
    pub reviews: Vec<String>,
    pub origin: ReviewOrigin,
}

/// A site-specific review scraper.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    fn origin(&self) -> ReviewOrigin;

    /// Whether this source knows how to scrape `product_url`.
    fn handles(&self, product_url: &str) -> bool;

    /// `page` is the product page when the caller already fetched it.
    async fn fetch(
        &self,
        client: &reqwest::Client,
        product_url: &str,
        page: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>>;
}

pub struct FlipkartSource;

#[async_trait]
impl ReviewSource for FlipkartSource {
    fn origin(&self) -> ReviewOrigin {
        ReviewOrigin::Flipkart
    }

    fn handles(&self, product_url: &str) -> bool {
        product_url.to_lowercase().contains("flipkart") && extract_flipkart_pid(product_url).is_some()
    }

    // reviews live on a separate listing page, so the product page is not enough
    async fn fetch(
        &self,
        client: &reqwest::Client,
        product_url: &str,
        _page: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>> {
        let pid = extract_flipkart_pid(product_url).context("Flipkart URL has no pid")?;
        let reviews_url = flipkart_reviews_url(product_url, &pid)?;
        let html = fetch_html(client, &reviews_url).await?;
        Ok(parse_reviews(&html, FLIPKART_REVIEW_SELECTORS, limit))
    }
}

pub struct AmazonSource;

#[async_trait]
impl ReviewSource for AmazonSource {
    fn origin(&self) -> ReviewOrigin {
        ReviewOrigin::Amazon
    }

    fn handles(&self, product_url: &str) -> bool {
        product_url.to_lowercase().contains("amazon")
    }

    async fn fetch(
        &self,
        client: &reqwest::Client,
        product_url: &str,
        page: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>> {
        let html = match page {
            Some(html) => html.to_string(),
            None => fetch_html(client, product_url).await?,
        };
        Ok(parse_reviews(&html, AMAZON_REVIEW_SELECTORS, limit))
    }
}

/// Tries each source that handles the URL, in order, and falls back to the
/// sample corpus when none of them yields a review.
pub struct ReviewCollector {
    client: reqwest::Client,
    sources: Vec<Box<dyn ReviewSource>>,
    limit: usize,
    use_samples: bool,
}

impl ReviewCollector {
    /// Flipkart first, then Amazon.
    pub fn new(client: reqwest::Client, limit: usize, use_samples: bool) -> Self {
        Self::with_sources(
            client,
            vec![Box::new(FlipkartSource), Box::new(AmazonSource)],
            limit,
            use_samples,
        )
    }

    pub fn with_sources(
        client: reqwest::Client,
        sources: Vec<Box<dyn ReviewSource>>,
        limit: usize,
        use_samples: bool,
    ) -> Self {
        Self {
            client,
            sources,
            limit,
            use_samples,
        }
    }

    /// First non-empty live result, if any.
    async fn scrape(&self, product_url: &str, page: Option<&str>) -> Option<CollectedReviews> {
        for source in self.sources.iter().filter(|s| s.handles(product_url)) {
            let origin = source.origin();
            match source.fetch(&self.client, product_url, page, self.limit).await {
                Ok(reviews) if !reviews.is_empty() => {
                    return Some(CollectedReviews { reviews, origin });
                }
                Ok(_) => info!("{:?} page had no reviews: {}", origin, product_url),
                Err(e) => warn!("{:?} scrape failed: {:#}", origin, e),
            }
        }
        None
    }

    pub async fn collect(&self, product_url: &str, page: Option<&str>) -> CollectedReviews {
        if let Some(collected) = self.scrape(product_url, page).await {
            info!("Collected {} live reviews ({:?})", collected.reviews.len(), collected.origin);
            return collected;
        }

        if self.use_samples {
            info!("No live reviews for {}, using sample corpus", product_url);
            CollectedReviews {
                reviews: SAMPLE_REVIEWS.iter().map(|s| s.to_string()).collect(),
                origin: ReviewOrigin::Sample,
            }
        } else {
            CollectedReviews {
                reviews: Vec::new(),
                origin: ReviewOrigin::Unavailable,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_extract_flipkart_pid() {
        let url = "https://www.flipkart.com/phone-x/p/itm123?pid=MOBGX123&lid=abc";
        assert_eq!(extract_flipkart_pid(url), Some("MOBGX123".to_string()));
        assert_eq!(extract_flipkart_pid("https://www.flipkart.com/phone-x/p/itm123"), None);
        assert_eq!(extract_flipkart_pid("https://www.flipkart.com/x?pid="), None);
        assert_eq!(extract_flipkart_pid("not a url"), None);
    }

    #[test]
    fn test_flipkart_reviews_url() {
        let url = flipkart_reviews_url(
            "https://www.flipkart.com/phone-x/p/itm123?pid=MOBGX123&lid=abc",
            "MOBGX123",
        )
        .unwrap();
        assert_eq!(url, "https://www.flipkart.com/phone-x/product-reviews/itm123?pid=MOBGX123");
    }

    #[test]
    fn test_parse_amazon_reviews() {
        let html = r#"
            <div data-hook="review-body"><span>  Great   sound,
                love it. </span></div>
            <div data-hook="review-body"><span>Stopped working after a month.</span></div>
            <div data-hook="review-body"><span>   </span></div>
        "#;
        let reviews = parse_reviews(html, AMAZON_REVIEW_SELECTORS, 50);
        assert_eq!(
            reviews,
            vec!["Great sound, love it.", "Stopped working after a month."]
        );
    }

    #[test]
    fn test_parse_respects_limit_and_selector_order() {
        let html = r#"<div class="t-ZTKy">one</div><div class="t-ZTKy">two</div><div class="t-ZTKy">three</div>"#;
        let reviews = parse_reviews(html, FLIPKART_REVIEW_SELECTORS, 2);
        assert_eq!(reviews, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_no_matches() {
        assert!(parse_reviews("<p>nothing here</p>", AMAZON_REVIEW_SELECTORS, 50).is_empty());
    }

    fn client() -> reqwest::Client {
        crate::fetch::build_client(Duration::from_secs(1)).unwrap()
    }

    const AMAZON_PAGE: &str = r#"<html><head><title>Speaker</title></head><body>
        <div data-hook="review-body"><span>Great sound.</span></div>
        <div data-hook="review-body"><span>Stopped working.</span></div>
    </body></html>"#;

    /// Canned source for exercising collector ordering.
    struct FixedSource {
        origin: ReviewOrigin,
        result: std::result::Result<Vec<&'static str>, &'static str>,
    }

    #[async_trait]
    impl ReviewSource for FixedSource {
        fn origin(&self) -> ReviewOrigin {
            self.origin
        }

        fn handles(&self, _product_url: &str) -> bool {
            true
        }

        async fn fetch(
            &self,
            _client: &reqwest::Client,
            _product_url: &str,
            _page: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<String>> {
            match &self.result {
                Ok(reviews) => Ok(reviews.iter().map(|r| r.to_string()).collect()),
                Err(e) => Err(anyhow::anyhow!(*e)),
            }
        }
    }

    #[test]
    fn test_sources_match_by_url() {
        let flipkart = "https://www.flipkart.com/phone-x/p/itm123?pid=MOBGX123";
        assert!(FlipkartSource.handles(flipkart));
        assert!(!FlipkartSource.handles("https://www.flipkart.com/phone-x/p/itm123"));
        assert!(!AmazonSource.handles(flipkart));
        assert!(AmazonSource.handles("https://www.Amazon.in/dp/B0TEST"));
    }

    #[tokio::test]
    async fn test_amazon_reuses_fetched_page() {
        let collector = ReviewCollector::new(client(), 50, true);
        // .invalid never resolves, so a second fetch would fail the scrape
        let collected = collector
            .collect("https://www.amazon.invalid/dp/B0TEST", Some(AMAZON_PAGE))
            .await;
        assert_eq!(collected.origin, ReviewOrigin::Amazon);
        assert_eq!(collected.reviews, vec!["Great sound.", "Stopped working."]);
    }

    #[tokio::test]
    async fn test_amazon_page_without_reviews_falls_back() {
        let collector = ReviewCollector::new(client(), 50, true);
        let collected = collector
            .collect("https://www.amazon.invalid/dp/B0TEST", Some("<p>no reviews</p>"))
            .await;
        assert_eq!(collected.origin, ReviewOrigin::Sample);
    }

    #[tokio::test]
    async fn test_sources_tried_in_order() {
        let sources: Vec<Box<dyn ReviewSource>> = vec![
            Box::new(FixedSource { origin: ReviewOrigin::Flipkart, result: Err("blocked") }),
            Box::new(FixedSource { origin: ReviewOrigin::Amazon, result: Ok(vec![]) }),
            Box::new(FixedSource { origin: ReviewOrigin::Provided, result: Ok(vec!["first"]) }),
            Box::new(FixedSource { origin: ReviewOrigin::Sample, result: Ok(vec!["second"]) }),
        ];
        let collector = ReviewCollector::with_sources(client(), sources, 50, true);
        let collected = collector.collect("https://shop.example/item/1", None).await;
        assert_eq!(collected.origin, ReviewOrigin::Provided);
        assert_eq!(collected.reviews, vec!["first"]);
    }

    #[tokio::test]
    async fn test_unknown_site_uses_samples() {
        let collector = ReviewCollector::new(client(), 50, true);
        let collected = collector.collect("https://shop.example/item/1", None).await;
        assert_eq!(collected.origin, ReviewOrigin::Sample);
        assert_eq!(collected.reviews.len(), SAMPLE_REVIEWS.len());
    }

    #[tokio::test]
    async fn test_samples_disabled_yields_empty() {
        let collector = ReviewCollector::new(client(), 50, false);
        let collected = collector.collect("https://shop.example/item/1", None).await;
        assert_eq!(collected.origin, ReviewOrigin::Unavailable);
        assert!(collected.reviews.is_empty());
    }
}
