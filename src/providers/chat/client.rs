use std::time::Duration;

use reqwest::Client;

use super::types::{ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl};
use crate::provider::CodeProvider;
use crate::providers::DEFAULT_TIMEOUT;
use crate::{Error, Prompt};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Groq's vision-capable model.
pub const GROQ_MODEL: &str = "llama-3.2-90b-vision-preview";

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-001";

/// Application attribution headers OpenRouter expects from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for Attribution {
    fn default() -> Self {
        Self {
            referer: "http://localhost".to_string(),
            title: "Bytez Code Test".to_string(),
        }
    }
}

/// Provider speaking the chat-completion schema.
pub struct ChatCompletionProvider {
    client: Client,
    name: &'static str,
    api_key: String,
    base_url: String,
    model: String,
    attribution: Option<Attribution>,
}

impl ChatCompletionProvider {
    /// Create a chat-completion provider against an arbitrary endpoint.
    pub fn new(
        name: &'static str,
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            name,
            api_key,
            base_url,
            model,
            attribution: None,
        })
    }

    /// Groq with its default endpoint and vision model.
    pub fn groq(api_key: String) -> Result<Self, Error> {
        Self::new(
            "Groq",
            api_key,
            GROQ_BASE_URL.to_string(),
            GROQ_MODEL.to_string(),
            DEFAULT_TIMEOUT,
        )
    }

    /// OpenRouter with its default endpoint and model.
    pub fn openrouter(api_key: String, attribution: Attribution) -> Result<Self, Error> {
        Ok(Self::new(
            "OpenRouter",
            api_key,
            OPENROUTER_BASE_URL.to_string(),
            OPENROUTER_MODEL.to_string(),
            DEFAULT_TIMEOUT,
        )?
        .with_attribution(attribution))
    }

    /// Attach `HTTP-Referer`/`X-Title` headers to every request.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = Some(attribution);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Convert a prompt to the chat-completion request format.
    fn convert_request(&self, prompt: &Prompt) -> ChatRequest {
        let mut content = vec![ContentPart::Text {
            text: prompt.text_content().to_string(),
        }];

        if let Some(image) = prompt.image() {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.to_data_url(),
                },
            });
        }

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }

    /// Turn a raw response into text or a classified error.
    fn convert_response(&self, status: u16, body: &str) -> Result<String, Error> {
        let success = (200..300).contains(&status);

        match serde_json::from_str::<ChatResponse>(body) {
            Ok(mut data) => {
                if let Some(error) = data.error.take() {
                    // OpenRouter reports upstream failures with a numeric code
                    // inside a 200 response.
                    let status = error
                        .code
                        .as_ref()
                        .and_then(|code| code.as_u64())
                        .and_then(|code| u16::try_from(code).ok())
                        .unwrap_or(status);
                    let message = error
                        .message
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(Error::classify(self.name, status, &message));
                }
                if !success {
                    return Err(Error::classify(self.name, status, "unknown error"));
                }
                Ok(data.first_content())
            }
            Err(e) => {
                if !success {
                    let message = match body.trim() {
                        "" => "unknown error",
                        text => text,
                    };
                    return Err(Error::classify(self.name, status, message));
                }
                Err(Error::provider(
                    self.name,
                    format!("Malformed response: {e}"),
                ))
            }
        }
    }
}

#[async_trait::async_trait]
impl CodeProvider for ChatCompletionProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, Error> {
        let request = self.convert_request(prompt);
        log::debug!(
            "Sending chat completion to {} (model {}, image: {})",
            self.name,
            self.model,
            prompt.image().is_some()
        );

        let mut request_builder = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request);

        if let Some(attribution) = &self.attribution {
            request_builder = request_builder
                .header("HTTP-Referer", &attribution.referer)
                .header("X-Title", &attribution.title);
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = self.convert_response(status, &body);
        if let Err(e) = &result {
            log::warn!("{} request failed: {e}", self.name);
        }
        result
    }
}
