use crate::transcript::{Metadata, Transcript};
use serde::{Deserialize, Serialize};

/// JSON export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDocument {
    pub title: String,
    pub source_url: String,
    pub generation_date: String,
    pub chat: Vec<ChatEntry>,
}

/// One turn in the JSON export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// User text
    pub user: String,

    /// Sanitized assistant HTML, or "(No AI response)"
    pub ai: String,
}

/// Structure a transcript for JSON output
pub fn to_json(transcript: &Transcript, metadata: &Metadata) -> ChatDocument {
    ChatDocument {
        title: transcript.title.clone(),
        source_url: metadata.source_url.clone(),
        generation_date: metadata.generation_date.clone(),
        chat: transcript
            .turns
            .iter()
            .map(|turn| ChatEntry {
                user: turn.user.clone(),
                ai: turn.assistant.to_html(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Fragment;
    use crate::transcript::Turn;
    use serde_json::json;

    #[test]
    fn test_to_json_shape() {
        let transcript = Transcript::new(
            "Test Chat",
            vec![Turn::answered("Hello", Fragment::parse("<p>Hi there</p>"))],
        );
        let metadata = Metadata::new("https://gemini.google.com/app/1", "October 18, 2026 at 3:04 PM");

        let value = serde_json::to_value(to_json(&transcript, &metadata)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Test Chat",
                "sourceUrl": "https://gemini.google.com/app/1",
                "generationDate": "October 18, 2026 at 3:04 PM",
                "chat": [{ "user": "Hello", "ai": "<p>Hi there</p>" }]
            })
        );
    }

    #[test]
    fn test_missing_reply_sentinel() {
        let transcript = Transcript::new("t", vec![Turn::unanswered("anyone?")]);
        let document = to_json(&transcript, &Metadata::new("u", "d"));

        assert_eq!(document.chat[0].ai, "(No AI response)");
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new("t", Vec::new());
        let value = serde_json::to_value(to_json(&transcript, &Metadata::new("u", "d"))).unwrap();

        assert_eq!(value["chat"], json!([]));
    }
}
