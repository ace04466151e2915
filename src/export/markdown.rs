use crate::error::{ExportError, Result};
use crate::transcript::{Metadata, Transcript};
use htmd::HtmlToMarkdown;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};

/// Label placed before user input
pub const USER_LABEL: &str = "**You:**";

/// Label placed before assistant output
pub const ASSISTANT_LABEL: &str = "**Gemini:**";

/// HTML to Markdown rule engine for assistant output
///
/// ATX headings, fenced code blocks. The summary bar of code block widgets is
/// dropped so only the code itself ends up in the document.
pub struct MarkdownConverter {
    converter: HtmlToMarkdown,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let converter = HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .skip_tags(vec!["summary", "script", "style"])
            .build();

        Self { converter }
    }

    /// Convert an HTML snippet to Markdown
    pub fn convert(&self, html: &str) -> Result<String> {
        self.converter
            .convert(html)
            .map_err(|e| ExportError::Markdown(e.to_string()))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a transcript as a Markdown document
pub fn to_markdown(transcript: &Transcript, metadata: &Metadata) -> Result<String> {
    let converter = MarkdownConverter::new();
    let mut markdown = format!("# {}\n\n", transcript.title);

    for turn in &transcript.turns {
        markdown.push_str(USER_LABEL);
        markdown.push_str("\n\n> ");
        markdown.push_str(&turn.user.replace('\n', "\n> "));
        markdown.push_str("\n\n");

        if let Some(fragment) = turn.assistant.fragment() {
            let html = fragment.to_html();
            if !html.is_empty() {
                markdown.push_str(ASSISTANT_LABEL);
                markdown.push_str("\n\n");
                markdown.push_str(&converter.convert(&html)?);
                markdown.push_str("\n\n");
            }
        }

        markdown.push_str("---\n\n");
    }

    markdown.push_str(&format!(
        "*Generated on: {} from [{}]({})*",
        metadata.generation_date, metadata.source_url, metadata.source_url
    ));

    Ok(markdown)
}
