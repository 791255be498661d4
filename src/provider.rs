use crate::{Error, Prompt};

/// A text/vision generation service that turns a prompt into raw text.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry; the returned text still has to go through [`crate::normalize`].
#[async_trait::async_trait]
pub trait CodeProvider: Send + Sync + 'static {
    /// Human-readable provider name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send the prompt and return the provider's free-form text answer.
    async fn complete(&self, prompt: &Prompt) -> Result<String, Error>;
}
