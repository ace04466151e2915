use crate::{error::{ExportError, Result},
            transcript::{PageSelectors, PageSnapshot, TranscriptHost}};
use async_trait::async_trait;
use headless_chrome::Tab;
use std::sync::Arc;

/// Conversations can only be exported from pages under this prefix
pub const GEMINI_ORIGIN: &str = "https://gemini.google.com/";

/// Reject pages that are not Gemini conversations
pub fn ensure_supported_url(url: &str) -> Result<()> {
    if url.starts_with(GEMINI_ORIGIN) {
        Ok(())
    } else {
        Err(ExportError::UnsupportedPage(url.to_string()))
    }
}

fn expand_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        r#"(function() {{
            const controls = document.querySelectorAll({});
            controls.forEach((control) => control.click());
            return controls.length;
        }})()"#,
        selector
    ))
}

const SNAPSHOT_SCRIPT: &str =
    "JSON.stringify({ url: window.location.href, html: document.documentElement.outerHTML })";

/// A Gemini conversation open in a browser tab
pub struct LivePage {
    tab: Arc<Tab>,
    expand_control: String,
}

impl LivePage {
    /// Wrap a tab, using the default Gemini selectors
    pub fn new(tab: Arc<Tab>) -> Self {
        Self::with_selectors(tab, &PageSelectors::default())
    }

    /// Wrap a tab, clicking controls matched by `selectors.expand_control`
    pub fn with_selectors(tab: Arc<Tab>, selectors: &PageSelectors) -> Self {
        Self {
            tab,
            expand_control: selectors.expand_control.clone(),
        }
    }

    /// Current URL of the tab
    pub fn url(&self) -> String {
        self.tab.get_url()
    }

    async fn evaluate(&self, script: String) -> Result<serde_json::Value> {
        let tab = self.tab.clone();
        let result = tokio::task::spawn_blocking(move || tab.evaluate(&script, false))
            .await
            .map_err(|e| ExportError::EvaluationFailed(e.to_string()))?
            .map_err(|e| ExportError::EvaluationFailed(e.to_string()))?;

        result
            .value
            .ok_or_else(|| ExportError::EvaluationFailed("No value returned from JavaScript".to_string()))
    }
}

#[async_trait]
impl TranscriptHost for LivePage {
    async fn trigger_expand_controls(&self) -> Result<usize> {
        let value = self.evaluate(expand_script(&self.expand_control)?).await?;
        let clicked = value.as_u64().unwrap_or(0) as usize;
        log::debug!("Clicked {} expand controls", clicked);
        Ok(clicked)
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let value = self.evaluate(SNAPSHOT_SCRIPT.to_string()).await?;

        // The script returns a JSON string, so parse it a second time
        let json_str: String = serde_json::from_value(value)
            .map_err(|e| ExportError::EvaluationFailed(format!("Failed to get JSON string: {}", e)))?;
        let snapshot: PageSnapshot = serde_json::from_str(&json_str)
            .map_err(|e| ExportError::EvaluationFailed(format!("Failed to parse page snapshot: {}", e)))?;

        log::debug!("Captured {} bytes from {}", snapshot.html.len(), snapshot.url);
        Ok(snapshot)
    }
}
