//! Product page metadata from Open Graph and standard meta tags.

use anyhow::Result;
use scraper::{Html, Selector};
use serde::Serialize;
use utoipa::ToSchema;

use crate::fetch::fetch_html;
use crate::report::Metadata;

/// Preview card for a product URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Preview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

impl From<Preview> for Metadata {
    fn from(p: Preview) -> Self {
        Metadata {
            title: Some(p.title),
            description: Some(p.description),
            image: Some(p.image),
        }
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}

/// `meta[property=...]` first, then `meta[name=...]`.
fn og(document: &Html, prop: &str) -> Option<String> {
    meta_content(document, &format!("meta[property='{}']", prop))
        .or_else(|| meta_content(document, &format!("meta[name='{}']", prop)))
}

fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
}

/// Extracts the preview fields from an HTML document. Never fails.
pub fn extract_preview(html: &str, url: &str) -> Preview {
    let document = Html::parse_document(html);

    let title = og(&document, "og:title")
        .or_else(|| page_title(&document))
        .unwrap_or_default();
    let description = og(&document, "og:description")
        .or_else(|| og(&document, "description"))
        .unwrap_or_default();
    let image = og(&document, "og:image").unwrap_or_default();

    Preview {
        title,
        description,
        image,
        url: url.to_string(),
    }
}

pub async fn fetch_preview(client: &reqwest::Client, url: &str) -> Result<Preview> {
    let html = fetch_html(client, url).await?;
    Ok(extract_preview(&html, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><head>
            <title> Fallback Title </title>
            <meta property="og:title" content="Phone X 128GB">
            <meta name="description" content="Plain description">
            <meta property="og:image" content="https://img.example/phone.png">
        </head><body></body></html>
    "#;

    #[test]
    fn test_open_graph_preferred() {
        let preview = extract_preview(PAGE, "https://shop.example/p/1");
        assert_eq!(
            preview,
            Preview {
                title: "Phone X 128GB".to_string(),
                description: "Plain description".to_string(),
                image: "https://img.example/phone.png".to_string(),
                url: "https://shop.example/p/1".to_string(),
            }
        );
    }

    #[test]
    fn test_title_tag_fallback() {
        let html = r#"<html><head><title>Just A Title</title>
            <meta property="og:title" content="">
            <meta name="og:description" content="Named og description"></head></html>"#;
        let preview = extract_preview(html, "u");
        assert_eq!(preview.title, "Just A Title");
        assert_eq!(preview.description, "Named og description");
        assert_eq!(preview.image, "");
    }

    #[test]
    fn test_empty_document() {
        let preview = extract_preview("", "u");
        assert_eq!(preview.title, "");
        assert_eq!(preview.description, "");
        assert_eq!(preview.image, "");
        assert_eq!(preview.url, "u");
    }
}
