use serde::{ Serialize, Deserialize };

/// Fallback text when the server reply carries no usable message.
pub const NO_RESPONSE: &str = "No response";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One recorded exchange unit. Append-only, never edited.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub message: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// The `message` field of a chat reply is polymorphic on the wire: either a
/// plain string or an ordered list of `{text: {content}}` fragments.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplyMessage {
    Text(String),
    Fragments(Vec<ReplyFragment>),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReplyFragment {
    pub text: FragmentText,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FragmentText {
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Canonical display text for this reply, normalized once at ingestion.
    pub fn display_text(&self) -> String {
        normalize_reply(self.message.as_ref())
    }
}

/// Collapses the polymorphic reply shape into a single display string.
/// Fragment contents are joined with single spaces; an empty string, an empty
/// fragment list or an absent field all normalize to [`NO_RESPONSE`].
pub fn normalize_reply(message: Option<&ReplyMessage>) -> String {
    match message {
        Some(ReplyMessage::Text(text)) if !text.is_empty() => text.clone(),
        Some(ReplyMessage::Fragments(fragments)) if !fragments.is_empty() => {
            fragments
                .iter()
                .map(|fragment| fragment.text.content.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }
        _ => NO_RESPONSE.to_string(),
    }
}
