use serde::{Deserialize, Serialize};

/// Chat-completion request format (OpenAI-compatible).
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// A single chat message with multi-part content.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String, // always "user" for generation requests
    pub content: Vec<ContentPart>,
}

/// Part of a chat message's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference, sent as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat-completion response. Some providers report errors inside a
/// successful status, so `error` is checked regardless of status.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub error: Option<ChatError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Provider-reported error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ChatResponse {
    /// Text of the first choice, or empty when the provider sent none.
    pub fn first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}
