use std::time::Duration;

use reqwest::Client;

use super::types::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, InlineData};
use crate::provider::CodeProvider;
use crate::providers::DEFAULT_TIMEOUT;
use crate::{Error, Prompt};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Gemini provider authenticated with an API key.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a Gemini provider with the default endpoint and model.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::new_with_base_url(
            api_key,
            GEMINI_BASE_URL.to_string(),
            GEMINI_MODEL.to_string(),
            DEFAULT_TIMEOUT,
        )
    }

    /// Create a Gemini provider with custom base URL and model.
    pub fn new_with_base_url(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Convert a prompt to the Gemini request format.
    fn convert_request(prompt: &Prompt) -> GeminiRequest {
        let mut parts = Vec::new();

        if let Some(image) = prompt.image() {
            parts.push(GeminiPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.to_base64(),
                },
            });
        }

        parts.push(GeminiPart::Text {
            text: prompt.text_content().to_string(),
        });

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
        }
    }

    fn convert_response(status: u16, body: &str) -> Result<String, Error> {
        let success = (200..300).contains(&status);

        match serde_json::from_str::<GeminiResponse>(body) {
            Ok(response) => {
                if let Some(error) = &response.error {
                    let status = error.code.unwrap_or(status);
                    return Err(Error::classify("Gemini", status, &error.describe()));
                }
                if !success {
                    return Err(Error::classify("Gemini", status, "unknown error"));
                }
                if let Some(reason) = response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                {
                    log::debug!("Gemini finished with reason {reason}");
                }
                if let Some(usage) = &response.usage_metadata {
                    log::debug!(
                        "Gemini usage: {} prompt + {} output = {} tokens",
                        usage.prompt_token_count.unwrap_or(0),
                        usage.candidates_token_count.unwrap_or(0),
                        usage.total_token_count.unwrap_or(0)
                    );
                }
                Ok(response.text())
            }
            Err(e) => {
                if !success {
                    let message = match body.trim() {
                        "" => "unknown error",
                        text => text,
                    };
                    return Err(Error::classify("Gemini", status, message));
                }
                Err(Error::provider("Gemini", format!("Malformed response: {e}")))
            }
        }
    }
}

#[async_trait::async_trait]
impl CodeProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, Error> {
        let request = Self::convert_request(prompt);
        log::debug!(
            "Sending generateContent to Gemini (model {}, image: {})",
            self.model,
            prompt.image().is_some()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = Self::convert_response(status, &body);
        if let Err(e) = &result {
            log::warn!("Gemini request failed: {e}");
        }
        result
    }
}
