//! One export, end to end
//!
//! expand lazy content → wait → extract → serialize → hand off to delivery.

use crate::{delivery::{DeliveryRequest, DeliverySender, PendingDelivery},
            error::Result,
            export::{ExportFormat, ExportPayload},
            transcript::{Metadata, PageSnapshot, SETTLE_DELAY, TranscriptExtractor, TranscriptHost}};
use serde::{Deserialize, Serialize};

/// Request from the invoking UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }
}

/// What happened to an export request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    /// A document was handed to delivery
    Processing,

    /// The page held no conversation; nothing was produced
    NothingToExport,
}

/// Answer to the invoking UI
///
/// Sent as soon as the document is queued for delivery. Whether the file was
/// actually written is only known by waiting on [`ExportResponse::pending`].
#[derive(Debug)]
pub struct ExportResponse {
    pub status: ExportStatus,

    /// Title of the exported conversation
    pub title: Option<String>,

    /// Number of turns in the exported document
    pub turns: usize,

    pending: Option<PendingDelivery>,
}

impl ExportResponse {
    fn nothing() -> Self {
        Self { status: ExportStatus::NothingToExport, title: None, turns: 0, pending: None }
    }

    /// Take the handle on the delivery outcome, if a document was dispatched
    pub fn pending(&mut self) -> Option<PendingDelivery> {
        self.pending.take()
    }
}

/// Runs exports against one host page
pub struct Exporter<H> {
    host: H,
    extractor: TranscriptExtractor,
    delivery: DeliverySender,
}

impl<H: TranscriptHost> Exporter<H> {
    /// Create an exporter reading from `host` and delivering through `delivery`
    pub fn new(host: H, extractor: TranscriptExtractor, delivery: DeliverySender) -> Self {
        Self { host, extractor, delivery }
    }

    /// Get the host page
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Handle one export request
    pub async fn handle(&self, request: ExportRequest) -> Result<ExportResponse> {
        log::info!("Exporting conversation as {}", request.format);

        self.expand_lazy_content().await;
        let snapshot = self.host.snapshot().await?;

        let Some((delivery_request, turns)) = self.prepare(request.format, &snapshot)? else {
            return Ok(ExportResponse::nothing());
        };

        let title = delivery_request.title.clone();
        let pending = self.delivery.dispatch(delivery_request).await?;

        Ok(ExportResponse { status: ExportStatus::Processing, title: Some(title), turns, pending: Some(pending) })
    }

    async fn expand_lazy_content(&self) {
        match self.host.trigger_expand_controls().await {
            Ok(0) => {}
            Ok(count) => {
                log::debug!("Expanded {} controls, waiting {:?}", count, SETTLE_DELAY);
                tokio::time::sleep(SETTLE_DELAY).await;
            }
            Err(e) => log::debug!("Could not expand lazy content: {}", e),
        }
    }

    /// Extract and serialize; `None` when there is nothing to export
    fn prepare(&self, format: ExportFormat, snapshot: &PageSnapshot) -> Result<Option<(DeliveryRequest, usize)>> {
        let Some(transcript) = self.extractor.extract_html(&snapshot.html) else {
            return Ok(None);
        };

        let metadata = Metadata::now(snapshot.url.as_str());
        let payload = ExportPayload::render(format, &transcript, &metadata)?;

        let turns = transcript.turns.len();
        Ok(Some((DeliveryRequest { payload, title: transcript.title }, turns)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{self, Delivery, DeliveryReceipt};
    use crate::error::ExportError;
    use crate::transcript::{PageSelectors, StaticPage};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Default, Clone)]
    struct Collect {
        requests: Arc<Mutex<Vec<DeliveryRequest>>>,
    }

    #[async_trait]
    impl Delivery for Collect {
        async fn deliver(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(DeliveryReceipt { path: PathBuf::from("collected"), bytes: 0 })
        }
    }

    struct LazyHost {
        expanded: AtomicUsize,
        page: StaticPage,
        fail_expand: bool,
    }

    #[async_trait]
    impl TranscriptHost for LazyHost {
        async fn trigger_expand_controls(&self) -> Result<usize> {
            self.expanded.fetch_add(1, Ordering::SeqCst);
            if self.fail_expand {
                return Err(ExportError::EvaluationFailed("detached".to_string()));
            }
            Ok(3)
        }

        async fn snapshot(&self) -> Result<PageSnapshot> {
            self.page.snapshot().await
        }
    }

    const PAGE: &str = concat!(
        r#"<html><body><div class="conversation-title gds-label-l">Lazy</div><chat-window>"#,
        r#"<span class="horizontal-container"><p class="query-text-line">q</p></span>"#,
        r#"<div id="model-response-message-contentr_1"><p>a</p></div>"#,
        r#"</chat-window></body></html>"#
    );

    fn extractor() -> TranscriptExtractor {
        TranscriptExtractor::new(PageSelectors::default()).unwrap()
    }

    #[tokio::test]
    async fn test_waits_after_expanding() {
        let collect = Collect::default();
        let (sender, _handle) = delivery::spawn(collect.clone());
        let host = LazyHost {
            expanded: AtomicUsize::new(0),
            page: StaticPage::new("https://gemini.google.com/app/1", PAGE),
            fail_expand: false,
        };
        let exporter = Exporter::new(host, extractor(), sender);

        let started = Instant::now();
        let mut response = exporter.handle(ExportRequest::new(ExportFormat::Json)).await.unwrap();

        assert!(started.elapsed() >= SETTLE_DELAY);
        assert_eq!(exporter.host().expanded.load(Ordering::SeqCst), 1);
        assert_eq!(response.status, ExportStatus::Processing);
        assert_eq!(response.title.as_deref(), Some("Lazy"));
        assert_eq!(response.turns, 1);

        response.pending().unwrap().wait().await.unwrap();
        assert_eq!(collect.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expand_failure_is_not_fatal() {
        let (sender, _handle) = delivery::spawn(Collect::default());
        let host = LazyHost {
            expanded: AtomicUsize::new(0),
            page: StaticPage::new("https://gemini.google.com/app/1", PAGE),
            fail_expand: true,
        };
        let exporter = Exporter::new(host, extractor(), sender);

        let response = exporter.handle(ExportRequest::new(ExportFormat::Html)).await.unwrap();
        assert_eq!(response.status, ExportStatus::Processing);
    }

    #[tokio::test]
    async fn test_nothing_to_export() {
        let collect = Collect::default();
        let (sender, handle) = delivery::spawn(collect.clone());
        let page = StaticPage::new("https://gemini.google.com/app", "<html><body><chat-window></chat-window></body></html>");
        let exporter = Exporter::new(page, extractor(), sender);

        let mut response = exporter.handle(ExportRequest::new(ExportFormat::Markdown)).await.unwrap();
        assert_eq!(response.status, ExportStatus::NothingToExport);
        assert!(response.pending().is_none());

        drop(exporter);
        handle.await.unwrap();
        assert!(collect.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_serde() {
        let request: ExportRequest = serde_json::from_str(r#"{"format": "md"}"#).unwrap();
        assert_eq!(request.format, ExportFormat::Markdown);
        assert_eq!(serde_json::to_string(&ExportStatus::NothingToExport).unwrap(), "\"nothing_to_export\"");
    }
}
