use platformed_playground::{
    generate_with, Error, GenerationOutcome, GenerationRequest, GeneratedDocument, PreviewState,
    RecordingSurface, Studio,
};
use wiremock::MockServer;

use super::providers::{
    gemini::GeminiTestSetup, groq::GroqTestSetup, openrouter::OpenRouterTestSetup,
    reference_image, ProviderTestSetup,
};

const GAME: &str = "<!DOCTYPE html><html><head><title>Snake</title></head><body><canvas></canvas></body></html>";

fn fenced(document: &str) -> String {
    format!("Here is your game:\n```html\n{document}\n```\nHave fun!")
}

/// Fresh session, one generation: the fenced reply ends up stored and running.
async fn run_create_test<T: ProviderTestSetup>() {
    let config = T::get_config();
    let mock_server = MockServer::start().await;

    let request = GenerationRequest::new("a snake game").with_image(reference_image());
    T::mount_generation_mock(&mock_server, &request, &fenced(GAME)).await;

    let provider = T::create_provider(&mock_server.uri());
    assert_eq!(provider.name(), config.name);
    assert_eq!(provider.model(), config.kind.default_model());

    let mut studio = Studio::new(provider, RecordingSurface::default());
    let outcome = studio
        .generate("a snake game", Some(reference_image()))
        .await
        .unwrap_or_else(|e| panic!("{} generation failed: {e}", config.name));

    assert_eq!(outcome, GenerationOutcome::Applied);
    assert_eq!(studio.session().document().as_str(), GAME);
    assert_eq!(studio.session().state(), PreviewState::Running);
    assert_eq!(studio.session().surface().content.as_deref(), Some(GAME));
    assert!(!studio.session().is_busy());
}

/// Existing code is sent along with the instruction and replaced by the reply.
async fn run_modify_test<T: ProviderTestSetup>() {
    let mock_server = MockServer::start().await;
    let modified = GAME.replace("Snake", "Snake with a timer");

    let request = GenerationRequest::new("add a timer")
        .with_existing(GeneratedDocument::new(GAME));
    T::mount_generation_mock(&mock_server, &request, &modified).await;

    let provider = T::create_provider(&mock_server.uri());
    let document = generate_with(provider.as_ref(), &request).await.unwrap();
    assert_eq!(document.as_str(), modified);
}

async fn run_error_test<T: ProviderTestSetup>(status: u16, message: &str) -> Error {
    let mock_server = MockServer::start().await;
    T::mount_error_mock(&mock_server, status, message).await;

    let provider = T::create_provider(&mock_server.uri());
    let mut studio = Studio::new(provider, RecordingSurface::default());
    studio.session_mut().set_document(GAME);

    let error = studio
        .generate("make it faster", None)
        .await
        .expect_err("error reply should fail the generation");

    assert_eq!(studio.session().document().as_str(), GAME);
    assert_eq!(studio.session().state(), PreviewState::Idle);
    assert!(!studio.session().is_busy());
    error
}

#[tokio::test]
async fn test_groq_generation() {
    run_create_test::<GroqTestSetup>().await;
    run_modify_test::<GroqTestSetup>().await;
}

#[tokio::test]
async fn test_openrouter_generation() {
    run_create_test::<OpenRouterTestSetup>().await;
    run_modify_test::<OpenRouterTestSetup>().await;
}

#[tokio::test]
async fn test_gemini_generation() {
    run_create_test::<GeminiTestSetup>().await;
    run_modify_test::<GeminiTestSetup>().await;
}

#[tokio::test]
async fn test_unknown_openrouter_user_is_invalid_credential() {
    let error = run_error_test::<OpenRouterTestSetup>(401, "User not found.").await;
    assert!(matches!(error, Error::InvalidCredential(_)), "got {error:?}");
}

#[tokio::test]
async fn test_groq_bad_key_is_invalid_credential() {
    let error = run_error_test::<GroqTestSetup>(401, "Invalid API Key").await;
    assert!(matches!(error, Error::InvalidCredential(_)), "got {error:?}");
}

#[tokio::test]
async fn test_gemini_quota_is_rate_limited() {
    let error = run_error_test::<GeminiTestSetup>(
        429,
        "Resource has been exhausted (e.g. check quota).",
    )
    .await;
    assert!(matches!(error, Error::RateLimited(_)), "got {error:?}");
}

#[tokio::test]
async fn test_gemini_permission_denied_is_invalid_credential() {
    let error = run_error_test::<GeminiTestSetup>(403, "Method doesn't allow unregistered callers").await;
    assert!(matches!(error, Error::InvalidCredential(_)), "got {error:?}");
}

#[tokio::test]
async fn test_server_error_passes_message_through() {
    let error = run_error_test::<GroqTestSetup>(500, "model overloaded").await;
    match error {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "Groq");
            assert!(message.contains("model overloaded"));
        }
        other => panic!("Expected provider error, got {other:?}"),
    }
}
