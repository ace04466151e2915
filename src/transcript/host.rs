use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How long to let lazily rendered content settle after expanding it
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// The page HTML together with the URL it was captured from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Page URL at capture time
    pub url: String,

    /// Serialized document (`document.documentElement.outerHTML`)
    pub html: String,
}

/// A page that renders a Gemini conversation
#[async_trait]
pub trait TranscriptHost: Send + Sync {
    /// Click every "expand" control once
    ///
    /// Returns the number of controls that were triggered.
    async fn trigger_expand_controls(&self) -> Result<usize>;

    /// Capture the current state of the page
    async fn snapshot(&self) -> Result<PageSnapshot>;
}

/// A page saved to disk, or any other fixed HTML document
#[derive(Debug, Clone)]
pub struct StaticPage {
    snapshot: PageSnapshot,
}

impl StaticPage {
    /// Create a static page from HTML and the URL it came from
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            snapshot: PageSnapshot {
                url: url.into(),
                html: html.into(),
            },
        }
    }

    /// Load a saved page from disk
    pub async fn from_file(path: impl AsRef<Path>, url: impl Into<String>) -> Result<Self> {
        let html = tokio::fs::read_to_string(path.as_ref()).await?;
        log::debug!("Loaded {} bytes from {}", html.len(), path.as_ref().display());
        Ok(Self::new(url, html))
    }
}

#[async_trait]
impl TranscriptHost for StaticPage {
    async fn trigger_expand_controls(&self) -> Result<usize> {
        // A saved page cannot render anything new
        Ok(0)
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_page_snapshot() {
        let page = StaticPage::new("https://gemini.google.com/app/1", "<html></html>");

        assert_eq!(page.trigger_expand_controls().await.unwrap(), 0);
        let snapshot = page.snapshot().await.unwrap();
        assert_eq!(snapshot.url, "https://gemini.google.com/app/1");
        assert_eq!(snapshot.html, "<html></html>");
    }

    #[tokio::test]
    async fn test_static_page_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.html");
        std::fs::write(&path, "<chat-window></chat-window>").unwrap();

        let page = StaticPage::from_file(&path, "file:///chat.html").await.unwrap();
        let snapshot = page.snapshot().await.unwrap();
        assert_eq!(snapshot.html, "<chat-window></chat-window>");
    }

    #[tokio::test]
    async fn test_static_page_missing_file() {
        let result = StaticPage::from_file("/definitely/not/here.html", "u").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{"url": "https://gemini.google.com/app", "html": "<p>x</p>"}"#;
        let snapshot: PageSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.url, "https://gemini.google.com/app");
        assert_eq!(snapshot.html, "<p>x</p>");
    }
}
