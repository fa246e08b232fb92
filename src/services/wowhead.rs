//! Wowhead scrape fallback.
//!
//! Best-effort only: used when the primary API has no usable image for a
//! set. Every failure here is a `Scrape` error and callers are expected to
//! swallow it — a broken scrape just means no image.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

const CDN_BASE: &str = "https://wow.zamimg.com";
const PAGE_BASE: &str = "https://www.wowhead.com";

/// Extract a usable preview image from a set page's HTML.
///
/// Looks for the OpenGraph image meta tag, skipping Wowhead's share-icon and
/// logo placeholders.
pub fn parse_set_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let og_image = Selector::parse(r#"meta[property="og:image"]"#).ok()?;

    document
        .select(&og_image)
        .filter_map(|meta| meta.value().attr("content"))
        .find(|url| !url.contains("share-icon") && !url.contains("logo"))
        .map(|url| url.to_string())
}

/// HTML scraper client for Wowhead set pages.
pub struct WowheadClient {
    http: Client,
    cdn_base: String,
    page_base: String,
}

impl WowheadClient {
    pub fn new() -> Self {
        Self::with_bases(CDN_BASE, PAGE_BASE)
    }

    fn with_bases(cdn_base: impl Into<String>, page_base: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            cdn_base: cdn_base.into(),
            page_base: page_base.into(),
        }
    }

    /// Wowhead page for a set.
    fn set_page_url(&self, set_id: u32) -> String {
        format!("{}/item-set={}", self.page_base, set_id)
    }

    /// Pre-rendered "dress" image candidates hosted on Wowhead's CDN.
    fn dress_image_urls(&self, set_id: u32) -> [String; 2] {
        [
            format!("{}/images/wow/dress/{}.jpg", self.cdn_base, set_id),
            format!("{}/images/wow/dress/{}.png", self.cdn_base, set_id),
        ]
    }

    /// Find a preview image for a set: first the CDN dress renders, then the
    /// set page's OpenGraph image. `None` when nothing usable exists.
    ///
    /// A failed probe counts as a miss and the chain moves on; only a failed
    /// page fetch surfaces as an error.
    pub async fn fetch_set_image(&self, set_id: u32) -> Result<Option<String>> {
        for url in self.dress_image_urls(set_id) {
            match self.http.head(&url).send().await {
                Ok(probe) if probe.status().is_success() => return Ok(Some(url)),
                Ok(_) => {}
                Err(e) => log::debug!("Dress probe failed for {}: {}", url, e),
            }
        }

        let page = self
            .http
            .get(self.set_page_url(set_id))
            .send()
            .await
            .map_err(AppError::scrape)?;
        if !page.status().is_success() {
            return Err(AppError::scrape(format!(
                "set page returned HTTP {}",
                page.status()
            )));
        }

        let html = page.text().await.map_err(AppError::scrape)?;
        Ok(parse_set_image(&html))
    }
}

impl Default for WowheadClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn parses_og_image() {
        let html = r#"
            <html><head>
            <meta property="og:title" content="Lawbringer Armor">
            <meta property="og:image" content="https://wow.zamimg.com/uploads/screenshots/normal/12345.jpg">
            </head><body></body></html>
        "#;
        assert_eq!(
            parse_set_image(html),
            Some("https://wow.zamimg.com/uploads/screenshots/normal/12345.jpg".to_string())
        );
    }

    #[test]
    fn skips_share_icon_and_logo() {
        let html = r#"
            <html><head>
            <meta property="og:image" content="https://wow.zamimg.com/images/logos/share-icon.png">
            <meta property="og:image" content="https://wow.zamimg.com/images/logos/wowhead-logo.png">
            </head><body></body></html>
        "#;
        assert_eq!(parse_set_image(html), None);
    }

    #[test]
    fn no_meta_yields_none() {
        assert_eq!(parse_set_image("<html><body>hi</body></html>"), None);
    }

    #[test]
    fn set_page_url_format() {
        let client = WowheadClient::new();
        assert_eq!(
            client.set_page_url(1060),
            "https://www.wowhead.com/item-set=1060"
        );
    }

    /// Minimal HTTP listener answering every request with a fixed response.
    async fn spawn_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = sock.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = sock.write_all(response.as_bytes()).await;
            }
        });
        base
    }

    /// An address with nothing listening on it.
    fn dead_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        base
    }

    #[tokio::test]
    async fn unreachable_cdn_falls_through_to_page_scrape() {
        let page = spawn_server(
            "200 OK",
            r#"<html><head><meta property="og:image" content="https://img.example/preview.jpg"></head></html>"#,
        )
        .await;
        let client = WowheadClient::with_bases(dead_base(), page);

        // Both dress probes hit a dead port; that must not abort the chain.
        let image = client.fetch_set_image(1060).await.unwrap();
        assert_eq!(image, Some("https://img.example/preview.jpg".to_string()));
    }

    #[tokio::test]
    async fn missing_dress_render_uses_page_image() {
        let cdn = spawn_server("404 Not Found", "").await;
        let page = spawn_server(
            "200 OK",
            r#"<html><head><meta property="og:image" content="https://img.example/other.jpg"></head></html>"#,
        )
        .await;
        let client = WowheadClient::with_bases(cdn, page);

        let image = client.fetch_set_image(42).await.unwrap();
        assert_eq!(image, Some("https://img.example/other.jpg".to_string()));
    }

    #[tokio::test]
    async fn live_dress_render_wins() {
        let cdn = spawn_server("200 OK", "").await;
        let client = WowheadClient::with_bases(cdn.clone(), dead_base());

        let image = client.fetch_set_image(7).await.unwrap();
        assert_eq!(image, Some(format!("{}/images/wow/dress/7.jpg", cdn)));
    }

    #[tokio::test]
    async fn unreachable_page_is_a_scrape_error() {
        let client = WowheadClient::with_bases(dead_base(), dead_base());
        let err = client.fetch_set_image(9).await.unwrap_err();
        assert!(matches!(err, AppError::Scrape(_)));
    }
}
