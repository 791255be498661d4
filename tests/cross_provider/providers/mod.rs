pub mod gemini;
pub mod groq;
pub mod openrouter;

use platformed_playground::{CodeProvider, GenerationRequest, ProviderKind, ReferenceImage};
use std::sync::Arc;
use wiremock::MockServer;

/// A tiny PNG-looking payload; providers only ever see it base64 encoded.
pub fn reference_image() -> ReferenceImage {
    ReferenceImage::new("image/png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a])
}

/// Provider configuration for cross-provider testing
#[derive(Debug, Clone)]
pub struct ProviderTestConfig {
    pub name: &'static str,
    pub kind: ProviderKind,
    pub credential: &'static str,
}

/// Trait for provider-specific test setup
#[async_trait::async_trait]
pub trait ProviderTestSetup {
    /// Get the provider configuration
    fn get_config() -> ProviderTestConfig;

    /// Create the provider instance pointed at the mock server
    fn create_provider(base_url: &str) -> Arc<dyn CodeProvider>;

    /// Mount a mock that only matches the exact payload for `request` and
    /// answers with `reply` as the generated text.
    async fn mount_generation_mock(mock_server: &MockServer, request: &GenerationRequest, reply: &str);

    /// Mount a mock answering every generation call with an error envelope.
    async fn mount_error_mock(mock_server: &MockServer, status: u16, message: &str);
}
