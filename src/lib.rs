//! # gemini-export
//!
//! Export Gemini conversations to portable documents: a standalone HTML page,
//! structured JSON, or Markdown.
//!
//! ## Features
//!
//! - **Transcript Extraction**: Pair user inputs with assistant replies straight from the rendered page
//! - **Sanitization**: Strip Angular/tracking attributes and UI chrome, turn code blocks into collapsible widgets
//! - **Three Formats**: Self-contained HTML (inline CSS/JS, light/dark), JSON, and Markdown
//! - **Live or Saved Pages**: Read from a Chrome tab over CDP, or from a saved HTML file
//!
//! ## Command Line
//!
//! ```bash
//! # Attach to a running Chrome (started with --remote-debugging-port=9222)
//! cargo run -- --ws-endpoint ws://127.0.0.1:9222/devtools/browser/<id> --format md
//!
//! # Export a saved page
//! cargo run -- --input chat.html --source-url https://gemini.google.com/app/abc --format json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use gemini_export::{ExportFormat, ExportRequest, Exporter, FileDelivery, StaticPage};
//! use gemini_export::transcript::{PageSelectors, TranscriptExtractor};
//!
//! # async fn run() -> gemini_export::Result<()> {
//! let page = StaticPage::from_file("chat.html", "https://gemini.google.com/app/abc").await?;
//! let extractor = TranscriptExtractor::new(PageSelectors::default())?;
//! let (delivery, _relay) = gemini_export::delivery::spawn(FileDelivery::new("exports"));
//!
//! let exporter = Exporter::new(page, extractor, delivery);
//! let mut response = exporter.handle(ExportRequest::new(ExportFormat::Markdown)).await?;
//!
//! if let Some(pending) = response.pending() {
//!     let receipt = pending.wait().await?;
//!     println!("Saved {}", receipt.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Owned markup trees, parsing and serialization
//! - [`transcript`]: Host pages, turn extraction, and sanitization
//! - [`export`]: HTML, JSON, and Markdown serializers
//! - [`delivery`]: Saving documents, and the relay that feeds the saver
//! - [`browser`]: Chrome session management and live Gemini tabs
//! - [`pipeline`]: The end-to-end export request
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod delivery;
pub mod dom;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod transcript;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, LivePage};
pub use delivery::{Delivery, DeliveryReceipt, DeliveryRequest, FileDelivery};
pub use dom::{Element, Fragment, Node};
pub use error::{ExportError, Result};
pub use export::{ChatDocument, ExportFormat, ExportPayload};
pub use pipeline::{ExportRequest, ExportResponse, ExportStatus, Exporter};
pub use transcript::{Metadata, Reply, StaticPage, Transcript, TranscriptHost, Turn};
