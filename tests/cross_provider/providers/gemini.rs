use super::{ProviderTestConfig, ProviderTestSetup};
use platformed_playground::{
    CodeProvider, GenerationRequest, Prompt, ProviderConfig, ProviderFactory, ProviderKind,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct GeminiTestSetup;

fn generate_path() -> String {
    format!(
        "/models/{}:generateContent",
        ProviderKind::Gemini.default_model()
    )
}

#[async_trait::async_trait]
impl ProviderTestSetup for GeminiTestSetup {
    fn get_config() -> ProviderTestConfig {
        ProviderTestConfig {
            name: "Gemini",
            kind: ProviderKind::Gemini,
            credential: "AIzaSy-test",
        }
    }

    fn create_provider(base_url: &str) -> Arc<dyn CodeProvider> {
        let config = ProviderConfig::from_credential(Self::get_config().credential)
            .expect("Failed to build Gemini config")
            .with_base_url(base_url);
        ProviderFactory::create(&config).expect("Failed to create Gemini provider")
    }

    async fn mount_generation_mock(mock_server: &MockServer, request: &GenerationRequest, reply: &str) {
        let prompt = Prompt::for_request(request);
        let mut parts = Vec::new();
        if let Some(image) = prompt.image() {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.to_base64() }
            }));
        }
        parts.push(json!({ "text": prompt.text_content() }));

        Mock::given(method("POST"))
            .and(path(generate_path()))
            .and(header("x-goog-api-key", "AIzaSy-test"))
            .and(body_json(json!({
                "contents": [{ "role": "user", "parts": parts }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": reply }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": {
                    "promptTokenCount": 120,
                    "candidatesTokenCount": 900,
                    "totalTokenCount": 1020
                }
            })))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    async fn mount_error_mock(mock_server: &MockServer, status: u16, message: &str) {
        let error_status = match status {
            429 => "RESOURCE_EXHAUSTED",
            403 => "PERMISSION_DENIED",
            _ => "INVALID_ARGUMENT",
        };
        Mock::given(method("POST"))
            .and(path(generate_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": message, "status": error_status }
            })))
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
