use super::groq::{chat_payload, chat_reply};
use super::{ProviderTestConfig, ProviderTestSetup};
use platformed_playground::{
    CodeProvider, GenerationRequest, ProviderConfig, ProviderFactory, ProviderKind,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct OpenRouterTestSetup;

#[async_trait::async_trait]
impl ProviderTestSetup for OpenRouterTestSetup {
    fn get_config() -> ProviderTestConfig {
        ProviderTestConfig {
            name: "OpenRouter",
            kind: ProviderKind::OpenRouter,
            credential: "sk-or-v1-test",
        }
    }

    fn create_provider(base_url: &str) -> Arc<dyn CodeProvider> {
        let config = ProviderConfig::from_credential(Self::get_config().credential)
            .expect("Failed to build OpenRouter config")
            .with_base_url(base_url);
        ProviderFactory::create(&config).expect("Failed to create OpenRouter provider")
    }

    async fn mount_generation_mock(mock_server: &MockServer, request: &GenerationRequest, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-or-v1-test"))
            .and(header("HTTP-Referer", "http://localhost"))
            .and(header("X-Title", "Bytez Code Test"))
            .and(body_json(chat_payload(
                ProviderKind::OpenRouter.default_model(),
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
                "error": { "message": message, "code": status }
            })))
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
