//! Document serializers
//!
//! Each format turns a [`Transcript`] plus its [`Metadata`] into a single
//! portable document:
//! - [`html`]: standalone, styled, interactive HTML page
//! - [`markdown`]: Markdown via an HTML to Markdown rule engine
//! - [`json`]: structured document

pub mod html;
pub mod json;
pub mod markdown;

pub use html::{escape_html, to_html_document};
pub use json::{ChatDocument, ChatEntry, to_json};
pub use markdown::{MarkdownConverter, to_markdown};

use crate::error::{ExportError, Result};
use crate::transcript::{Metadata, Transcript};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Json,
    #[serde(rename = "md")]
    Markdown,
}

impl ExportFormat {
    /// All supported formats
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Html, ExportFormat::Json, ExportFormat::Markdown];

    /// Short discriminator used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }

    /// MIME type of the delivered file
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    /// File extension, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => ".html",
            ExportFormat::Json => ".json",
            ExportFormat::Markdown => ".md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// A serialized document, tagged by format
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPayload {
    Html(String),
    Json(ChatDocument),
    Markdown(String),
}

impl ExportPayload {
    /// Serialize a transcript in the requested format
    pub fn render(format: ExportFormat, transcript: &Transcript, metadata: &Metadata) -> Result<Self> {
        Ok(match format {
            ExportFormat::Html => ExportPayload::Html(to_html_document(transcript, metadata)),
            ExportFormat::Json => ExportPayload::Json(to_json(transcript, metadata)),
            ExportFormat::Markdown => ExportPayload::Markdown(to_markdown(transcript, metadata)?),
        })
    }

    /// Format discriminator of this payload
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportPayload::Html(_) => ExportFormat::Html,
            ExportPayload::Json(_) => ExportFormat::Json,
            ExportPayload::Markdown(_) => ExportFormat::Markdown,
        }
    }

    /// MIME type of this payload
    pub fn content_type(&self) -> &'static str {
        self.format().content_type()
    }

    /// File contents: documents as-is, JSON pretty-printed
    pub fn body(&self) -> Result<String> {
        match self {
            ExportPayload::Html(document) | ExportPayload::Markdown(document) => Ok(document.clone()),
            ExportPayload::Json(document) => serde_json::to_string_pretty(document).map_err(ExportError::from),
        }
    }
}
