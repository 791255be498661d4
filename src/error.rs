use thiserror::Error;

use crate::types::Locale;

/// What kind of user input was missing when an action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Neither an instruction nor a reference image was supplied for generation.
    Instruction,
    /// The action needs program text but the current document is blank.
    Document,
}

/// Errors that can occur when using the platformed-playground library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No API credential configured")]
    MissingCredential,

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Empty input: {0:?}")]
    EmptyInput(InputKind),

    #[error("A generation request is already in flight")]
    Busy,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Classify a failed provider call from its status and error text.
    ///
    /// Rate limits win over credential problems. Status codes are matched on
    /// `status`; the message is only searched for provider-specific markers.
    pub fn classify(provider: &str, status: u16, message: &str) -> Self {
        let combined = format!("HTTP {status}: {message}");

        if status == 429 || message.to_lowercase().contains("quota") {
            return Error::RateLimited(combined);
        }

        if matches!(status, 401 | 403)
            || message.contains("User not found")
            || message.contains("PERMISSION_DENIED")
            || message.contains("API_KEY_INVALID")
        {
            return Error::InvalidCredential(combined);
        }

        Error::provider(provider, message)
    }

    /// Localized, human-readable text for a blocking notification.
    pub fn user_message(&self, locale: Locale) -> String {
        match (locale, self) {
            (Locale::English, Error::MissingCredential) => {
                "Critical error: no API key found. Set PLAYGROUND_API_KEY.".to_string()
            }
            (Locale::Portuguese, Error::MissingCredential) => {
                "Erro crítico: API Key não encontrada. Defina PLAYGROUND_API_KEY.".to_string()
            }
            (Locale::English, Error::InvalidCredential(_)) => {
                "Authentication error. Check that the API key is valid.".to_string()
            }
            (Locale::Portuguese, Error::InvalidCredential(_)) => {
                "Erro de autenticação. Verifique se a chave de API é válida.".to_string()
            }
            (Locale::English, Error::RateLimited(_)) => {
                "AI usage limit reached. Try again in a few moments.".to_string()
            }
            (Locale::Portuguese, Error::RateLimited(_)) => {
                "Limite de uso da IA atingido. Tente novamente em alguns instantes.".to_string()
            }
            (Locale::English, Error::EmptyInput(InputKind::Document)) => {
                "Please paste the game's HTML code first!".to_string()
            }
            (Locale::Portuguese, Error::EmptyInput(InputKind::Document)) => {
                "Por favor, cole o código HTML do jogo primeiro!".to_string()
            }
            (Locale::English, Error::EmptyInput(InputKind::Instruction)) => {
                "Describe what to build or attach a reference image.".to_string()
            }
            (Locale::Portuguese, Error::EmptyInput(InputKind::Instruction)) => {
                "Descreva o que criar ou anexe uma imagem de referência.".to_string()
            }
            (Locale::English, Error::Busy) => {
                "A generation is already running. Wait for it to finish.".to_string()
            }
            (Locale::Portuguese, Error::Busy) => {
                "Já existe uma geração em andamento. Aguarde a conclusão.".to_string()
            }
            (Locale::English, Error::Provider { message, .. }) => {
                format!("The AI returned an error: {message}")
            }
            (Locale::Portuguese, Error::Provider { message, .. }) => {
                format!("Ocorreu um erro na IA: {message}")
            }
            (Locale::English, other) => format!("Something went wrong: {other}"),
            (Locale::Portuguese, other) => format!("Ocorreu um erro: {other}"),
        }
    }
}
