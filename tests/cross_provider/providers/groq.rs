use super::{ProviderTestConfig, ProviderTestSetup};
use platformed_playground::{
    CodeProvider, GenerationRequest, Prompt, ProviderConfig, ProviderFactory, ProviderKind,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct GroqTestSetup;

/// Chat-completion payload as both Groq and OpenRouter expect it.
pub fn chat_payload(model: &str, request: &GenerationRequest) -> Value {
    let prompt = Prompt::for_request(request);
    let mut content = vec![json!({ "type": "text", "text": prompt.text_content() })];
    if let Some(image) = prompt.image() {
        content.push(json!({
            "type": "image_url",
            "image_url": { "url": image.to_data_url() }
        }));
    }

    json!({
        "model": model,
        "messages": [{ "role": "user", "content": content }]
    })
}

pub fn chat_reply(reply: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": reply },
            "finish_reason": "stop"
        }]
    })
}

#[async_trait::async_trait]
impl ProviderTestSetup for GroqTestSetup {
    fn get_config() -> ProviderTestConfig {
        ProviderTestConfig {
            name: "Groq",
            kind: ProviderKind::Groq,
            credential: "gsk_test-key",
        }
    }

    fn create_provider(base_url: &str) -> Arc<dyn CodeProvider> {
        let config = ProviderConfig::from_credential(Self::get_config().credential)
            .expect("Failed to build Groq config")
            .with_base_url(base_url);
        ProviderFactory::create(&config).expect("Failed to create Groq provider")
    }

    async fn mount_generation_mock(mock_server: &MockServer, request: &GenerationRequest, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer gsk_test-key"))
            .and(body_json(chat_payload(
                ProviderKind::Groq.default_model(),
                request,
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(reply)))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    async fn mount_error_mock(mock_server: &MockServer, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": message,
                    "type": "invalid_request_error"
                }
            })))
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
