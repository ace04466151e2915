//! Live browser access
//!
//! Launch or attach to Chrome over the DevTools Protocol and expose a Gemini
//! tab as a [`TranscriptHost`](crate::transcript::TranscriptHost).

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::{GEMINI_ORIGIN, LivePage, ensure_supported_url};
pub use session::BrowserSession;
