//! Transcript extraction
//!
//! Turns a rendered Gemini conversation into an ordered list of turns:
//! - [`host`]: where the page comes from (live tab or saved snapshot)
//! - [`extract`]: pairing user inputs with assistant outputs
//! - [`sanitize`]: making assistant markup portable

pub mod extract;
pub mod host;
pub mod sanitize;

pub use extract::{PageSelectors, TranscriptExtractor};
pub use host::{PageSnapshot, SETTLE_DELAY, StaticPage, TranscriptHost};
pub use sanitize::{AttributePolicy, sanitize};

use crate::dom::Fragment;
use chrono::{DateTime, Local, TimeZone};

/// Text used in place of an assistant reply that never arrived
pub const NO_RESPONSE: &str = "(No AI response)";

/// Assistant side of a turn
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Sanitized assistant markup
    Content(Fragment),

    /// No response was produced for this input
    Missing,
}

impl Reply {
    /// Get the fragment, if there is one
    pub fn fragment(&self) -> Option<&Fragment> {
        match self {
            Reply::Content(fragment) => Some(fragment),
            Reply::Missing => None,
        }
    }

    /// Check whether this is the "no response" sentinel
    pub fn is_missing(&self) -> bool {
        matches!(self, Reply::Missing)
    }

    /// Render as stored in exports: fragment HTML, or the sentinel text
    pub fn to_html(&self) -> String {
        match self {
            Reply::Content(fragment) => fragment.to_html(),
            Reply::Missing => NO_RESPONSE.to_string(),
        }
    }
}

/// One user input paired with the assistant's answer
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Newline-joined user text lines
    pub user: String,

    /// Assistant reply, or the sentinel
    pub assistant: Reply,
}

impl Turn {
    /// Create a turn with an assistant reply
    pub fn answered(user: impl Into<String>, fragment: Fragment) -> Self {
        Self {
            user: user.into(),
            assistant: Reply::Content(fragment),
        }
    }

    /// Create a turn whose input never got a reply
    pub fn unanswered(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: Reply::Missing,
        }
    }
}

/// A titled, ordered list of turns
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Conversation title
    pub title: String,

    /// Turns in document order
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// Create a new Transcript
    pub fn new(title: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            title: title.into(),
            turns,
        }
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check whether there are no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Where and when an export was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// URL of the page the transcript was taken from
    pub source_url: String,

    /// Human-readable generation timestamp
    pub generation_date: String,
}

impl Metadata {
    /// Create metadata from explicit values
    pub fn new(source_url: impl Into<String>, generation_date: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            generation_date: generation_date.into(),
        }
    }

    /// Create metadata stamped with the current local time
    pub fn now(source_url: impl Into<String>) -> Self {
        Self::at(source_url, &Local::now())
    }

    /// Create metadata stamped with the given time
    pub fn at<Tz: TimeZone>(source_url: impl Into<String>, time: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new(source_url, time.format("%B %-d, %Y at %-I:%M %p").to_string())
    }
}
