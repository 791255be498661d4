//! One-shot generation: request → prompt → provider → normalized document.

use crate::normalize::normalize;
use crate::{
    CodeProvider, Error, GeneratedDocument, GenerationRequest, Prompt, ProviderConfig,
    ProviderFactory,
};

/// Generate a document, choosing the provider from the credential's prefix.
///
/// Input and credential are both checked before any network call.
pub async fn generate(
    request: &GenerationRequest,
    credential: &str,
) -> Result<GeneratedDocument, Error> {
    request.validate()?;
    let config = ProviderConfig::from_credential(credential)?;
    let provider = ProviderFactory::create(&config)?;
    generate_with(provider.as_ref(), request).await
}

/// Generate a document with an already configured provider.
pub async fn generate_with(
    provider: &dyn CodeProvider,
    request: &GenerationRequest,
) -> Result<GeneratedDocument, Error> {
    request.validate()?;

    let prompt = Prompt::for_request(request);
    let mode = if request.existing().is_some() {
        "modify"
    } else {
        "create"
    };
    log::info!(
        "Requesting {mode} generation from {} ({})",
        provider.name(),
        provider.model()
    );

    let raw = provider.complete(&prompt).await?;
    let document = normalize(&raw);
    log::debug!(
        "Normalized {} bytes of provider output into {} bytes",
        raw.len(),
        document.len()
    );
    Ok(document)
}
