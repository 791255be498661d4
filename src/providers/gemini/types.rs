use serde::{Deserialize, Serialize};

/// Gemini `generateContent` request format.
#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

/// Gemini content (one conversational turn).
#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    pub role: String, // "user"
    pub parts: Vec<GeminiPart>,
}

/// Part of a Gemini content. Image parts go before the text part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeminiPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

/// Base64-encoded binary payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// Gemini API response.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub error: Option<GeminiError>,
    #[serde(default)]
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

/// Gemini response candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiResponseContent>,
    #[serde(default)]
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

/// Gemini usage metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount")]
    pub prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    pub candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    pub total_token_count: Option<u32>,
}

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<GeminiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
}

impl GeminiResponse {
    /// Concatenated answer text of the first candidate, skipping thoughts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl GeminiError {
    /// Message with status and detail reasons appended, so credential and
    /// quota failures stay recognisable after classification.
    pub fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        let mut tags: Vec<&str> = Vec::new();
        if let Some(status) = self.status.as_deref() {
            tags.push(status);
        }
        tags.extend(self.details.iter().filter_map(|d| d.reason.as_deref()));

        if tags.is_empty() {
            message.to_string()
        } else {
            format!("{message} ({})", tags.join("; "))
        }
    }
}
