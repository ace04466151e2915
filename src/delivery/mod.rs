//! Delivery of exported documents
//!
//! The export pipeline hands its payload to a [`Delivery`] collaborator through
//! the [`relay`]; the collaborator decides where the bytes end up.

pub mod relay;

pub use relay::{DeliverySender, PendingDelivery, spawn};

use crate::error::Result;
use crate::export::ExportPayload;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// Characters that are not allowed in file names on common platforms
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest title kept in a file name, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// A document ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    /// Serialized document, tagged by format
    pub payload: ExportPayload,

    /// Conversation title, used to name the file
    pub title: String,
}

/// Where a document was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Path of the written file
    pub path: PathBuf,

    /// Number of bytes written
    pub bytes: usize,
}

/// Turns a payload into a saved file
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt>;
}

/// Make a title safe for use in a file name
pub fn safe_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// File name for a document: `{title}_{YYYY-MM-DD}_{HH-MM-SS}{ext}`
pub fn file_name<Tz: TimeZone>(title: &str, extension: &str, time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}{}",
        safe_title(title),
        time.format("%Y-%m-%d_%H-%M-%S"),
        extension
    )
}

/// Writes documents to a directory on disk
#[derive(Debug, Clone)]
pub struct FileDelivery {
    output_dir: PathBuf,
    file_name: Option<PathBuf>,
}

impl FileDelivery {
    /// Save into the given directory, with generated file names
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: None,
        }
    }

    /// Builder method: always write to this path instead of a generated name
    ///
    /// Relative paths are resolved against the output directory.
    pub fn with_file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Directory files are saved into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the request would be written to at the given time
    pub fn target_path<Tz: TimeZone>(&self, request: &DeliveryRequest, time: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        match &self.file_name {
            Some(name) => self.output_dir.join(name),
            None => self.output_dir.join(file_name(
                &request.title,
                request.payload.format().extension(),
                time,
            )),
        }
    }
}

impl Default for FileDelivery {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl Delivery for FileDelivery {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt> {
        let path = self.target_path(request, &Local::now());
        let body = request.payload.body()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&path, body.as_bytes()).await?;

        log::info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            request.payload.content_type(),
            body.len()
        );

        Ok(DeliveryReceipt {
            path,
            bytes: body.len(),
        })
    }
}
