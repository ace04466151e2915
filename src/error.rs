use thiserror::Error;

/// Errors that can occur while exporting a chat transcript
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to launch the browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// A tab could not be created, listed, or found
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation did not complete
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the page failed or returned nothing usable
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The page is not a Gemini conversation
    #[error("Unsupported page '{0}': this exporter only works on gemini.google.com")]
    UnsupportedPage(String),

    /// A page selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// HTML to Markdown conversion failed
    #[error("Markdown conversion failed: {0}")]
    Markdown(String),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the exported document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delivery relay is no longer running
    #[error("Delivery unavailable: {0}")]
    DeliveryUnavailable(String),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
