use crate::{dom::Fragment,
            error::{ExportError, Result},
            transcript::{Transcript, Turn, sanitize::{AttributePolicy, sanitize_with}}};
use scraper::{ElementRef, Html, Selector};

/// Title used when the page does not show one
pub const DEFAULT_TITLE: &str = "Gemini Chat";

/// CSS selectors describing where the conversation lives in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    /// Conversation title (searched in the whole document)
    pub title: String,

    /// Element holding the conversation
    pub container: String,

    /// A block of user input
    pub user_marker: String,

    /// One line of user text inside a user block
    pub user_line: String,

    /// Rendered assistant output
    pub assistant: String,

    /// Controls that reveal lazily rendered content
    pub expand_control: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            title: "div.conversation-title.gds-label-l".to_string(),
            container: "chat-window".to_string(),
            user_marker: "span.horizontal-container".to_string(),
            user_line: "p.query-text-line".to_string(),
            assistant: r#"div[id^="model-response-message-contentr_"]"#.to_string(),
            expand_control: "button.expand-button".to_string(),
        }
    }
}

impl PageSelectors {
    /// Builder method: set the container selector
    pub fn container(mut self, selector: impl Into<String>) -> Self {
        self.container = selector.into();
        self
    }

    /// Builder method: set the title selector
    pub fn title(mut self, selector: impl Into<String>) -> Self {
        self.title = selector.into();
        self
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExportError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Groups a page's user inputs and assistant outputs into turns
#[derive(Debug, Clone)]
pub struct TranscriptExtractor {
    selectors: PageSelectors,
    policy: AttributePolicy,
    title: Selector,
    container: Selector,
    turn_nodes: Selector,
    user_marker: Selector,
    user_line: Selector,
}

impl TranscriptExtractor {
    /// Compile the given selectors
    pub fn new(selectors: PageSelectors) -> Result<Self> {
        let turn_nodes = format!("{}, {}", selectors.user_marker, selectors.assistant);

        Ok(Self {
            title: parse_selector(&selectors.title)?,
            container: parse_selector(&selectors.container)?,
            turn_nodes: parse_selector(&turn_nodes)?,
            user_marker: parse_selector(&selectors.user_marker)?,
            user_line: parse_selector(&selectors.user_line)?,
            policy: AttributePolicy::default(),
            selectors,
        })
    }

    /// Builder method: use a different attribute policy for assistant markup
    pub fn with_policy(mut self, policy: AttributePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the selectors this extractor was built from
    pub fn selectors(&self) -> &PageSelectors {
        &self.selectors
    }

    /// Parse a serialized page and extract its transcript
    pub fn extract_html(&self, html: &str) -> Option<Transcript> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }

    /// Extract the transcript from a parsed page
    ///
    /// Returns `None` when the page has no conversation container or the
    /// container holds no user or assistant blocks.
    pub fn extract(&self, document: &Html) -> Option<Transcript> {
        let title = self.title(document);

        let Some(container) = document.select(&self.container).next() else {
            log::info!("No conversation container found");
            return None;
        };

        let nodes: Vec<ElementRef<'_>> = container.select(&self.turn_nodes).collect();
        if nodes.is_empty() {
            log::info!("Conversation container holds no messages");
            return None;
        }

        let mut turns = Vec::new();
        let mut pending_user = String::new();

        for node in nodes {
            if self.user_marker.matches(&node) {
                if !pending_user.is_empty() {
                    turns.push(Turn::unanswered(std::mem::take(&mut pending_user)));
                }
                pending_user = self.user_text(node);
            } else {
                let fragment = sanitize_with(&Fragment::from_children(node), &self.policy);
                turns.push(Turn::answered(std::mem::take(&mut pending_user), fragment));
            }
        }

        if !pending_user.is_empty() {
            turns.push(Turn::unanswered(pending_user));
        }

        log::debug!("Extracted {} turns from '{}'", turns.len(), title);
        Some(Transcript::new(title, turns))
    }

    /// Read the conversation title, falling back to a fixed default
    pub fn title(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    fn user_text(&self, marker: ElementRef<'_>) -> String {
        marker
            .select(&self.user_line)
            .map(|line| line.text().collect::<String>().trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
