use crate::transcript::{Metadata, NO_RESPONSE, Reply, Transcript, Turn};

const STYLE: &str = include_str!("assets/transcript.css");
const SCRIPT: &str = include_str!("assets/transcript.js");

/// User inputs with more lines than this start collapsed
pub const COLLAPSE_LINE_THRESHOLD: usize = 5;

/// Escape `& < > " '` for insertion into HTML text or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn text_with_breaks(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

fn render_user_input(user: &str) -> String {
    let content = text_with_breaks(user);
    if user.split('\n').count() > COLLAPSE_LINE_THRESHOLD {
        format!(
            concat!(
                r#"<div class="user-input-long expandable" onclick="toggleExpand(this)">"#,
                r#"<div class="text-content">{}</div>"#,
                r#"<div class="expand-fade"></div>"#,
                r#"<div class="expand-prompt">Click to expand</div>"#,
                r#"</div>"#
            ),
            content
        )
    } else {
        format!(r#"<div class="text-content">{}</div>"#, content)
    }
}

fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Content(fragment) => fragment.to_html(),
        Reply::Missing => format!(r#"<p class="no-response">{}</p>"#, NO_RESPONSE),
    }
}

fn render_turn(turn: &Turn) -> String {
    format!(
        concat!(
            "<article class=\"turn\">\n",
            "      <div class=\"user-input\"><div class=\"label\">You</div>{}</div>\n",
            "      <div class=\"ai-output\"><div class=\"label\">Gemini</div><div class=\"markdown-body\">{}</div></div>\n",
            "    </article>\n"
        ),
        render_user_input(&turn.user),
        render_reply(&turn.assistant)
    )
}

fn render_footer(metadata: &Metadata) -> String {
    let url = escape_html(&metadata.source_url);
    format!(
        concat!(
            "<footer class=\"footer\">\n",
            "      <p>Generated on: {}<br>\n",
            "      Source: <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></p>\n",
            "    </footer>"
        ),
        escape_html(&metadata.generation_date),
        url,
        url
    )
}

/// Render a transcript as a standalone HTML document
///
/// Styles and script are inlined; the document loads nothing external.
pub fn to_html_document(transcript: &Transcript, metadata: &Metadata) -> String {
    let title = escape_html(&transcript.title);
    let turns: String = transcript.turns.iter().map(|turn| format!("    {}", render_turn(turn))).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
{style}  </style>
</head>
<body>
  <div class="container">
    <header class="chat-title">{title}</header>
    <div class="global-controls">
      <button id="toggle-all-code">Collapse All Code Blocks</button>
      <button id="toggle-all-inputs">Expand All Inputs</button>
    </div>
{turns}    {footer}
  </div>
  <script>
{script}  </script>
</body>
</html>
"#,
        title = title,
        style = STYLE,
        turns = turns,
        footer = render_footer(metadata),
        script = SCRIPT,
    )
}
