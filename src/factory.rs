use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::providers::chat::client::{
    GROQ_BASE_URL, GROQ_MODEL, OPENROUTER_BASE_URL, OPENROUTER_MODEL,
};
use crate::providers::gemini::client::{GEMINI_BASE_URL, GEMINI_MODEL};
use crate::providers::DEFAULT_TIMEOUT;
use crate::{Attribution, ChatCompletionProvider, CodeProvider, Error, GeminiProvider};

/// Supported generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Groq chat completions (vision-capable Llama).
    Groq,
    /// OpenRouter chat completions.
    OpenRouter,
    /// Gemini `generateContent` with inline image parts.
    Gemini,
}

impl ProviderKind {
    /// Infer the provider from the shape of a credential.
    ///
    /// `gsk_` keys are Groq, `sk-or-` keys are OpenRouter, anything else is
    /// treated as a Gemini key.
    pub fn infer(credential: &str) -> Self {
        let credential = credential.trim();
        if credential.starts_with("gsk_") {
            ProviderKind::Groq
        } else if credential.starts_with("sk-or-") {
            ProviderKind::OpenRouter
        } else {
            ProviderKind::Gemini
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => GROQ_BASE_URL,
            ProviderKind::OpenRouter => OPENROUTER_BASE_URL,
            ProviderKind::Gemini => GEMINI_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => GROQ_MODEL,
            ProviderKind::OpenRouter => OPENROUTER_MODEL,
            ProviderKind::Gemini => GEMINI_MODEL,
        }
    }

    /// Whether this provider speaks the chat-completion schema.
    pub fn is_chat_completion(&self) -> bool {
        matches!(self, ProviderKind::Groq | ProviderKind::OpenRouter)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Groq => "groq",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Gemini => "gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(Error::config(format!(
                "Invalid provider '{other}'. Valid values are: groq, openrouter, gemini"
            ))),
        }
    }
}

/// Configuration for creating providers.
#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub attribution: Attribution,
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("attribution", &self.attribution)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Create configuration for an explicitly chosen provider.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::MissingCredential);
        }

        let inferred = ProviderKind::infer(&api_key);
        if inferred != kind && inferred.is_chat_completion() {
            log::warn!("Configured provider is {kind} but the credential looks like a {inferred} key");
        }

        Ok(Self {
            kind,
            api_key,
            model: None,
            base_url: None,
            attribution: Attribution::default(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create configuration by inferring the provider from the credential.
    pub fn from_credential(credential: &str) -> Result<Self, Error> {
        let kind = ProviderKind::infer(credential);
        Self::new(kind, credential)
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the OpenRouter attribution headers.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model that will be sent with requests.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    /// Endpoint base URL that requests will go to.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
    }

    /// Create configuration from environment variables.
    ///
    /// The credential is required: there is no built-in fallback key.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_with_kind(None)
    }

    /// Like [`ProviderConfig::from_env`], but an explicit `kind` replaces
    /// `PLAYGROUND_PROVIDER`, which is then not read at all.
    pub fn from_env_with_kind(kind: Option<ProviderKind>) -> Result<Self, Error> {
        Self::from_vars(|name| env::var(name).ok(), kind)
    }

    fn from_vars(
        var: impl Fn(&str) -> Option<String>,
        kind: Option<ProviderKind>,
    ) -> Result<Self, Error> {
        let non_empty = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("PLAYGROUND_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or(Error::MissingCredential)?;

        let kind = match kind {
            Some(kind) => Some(kind),
            None => non_empty("PLAYGROUND_PROVIDER")
                .map(|kind| kind.parse::<ProviderKind>())
                .transpose()?,
        };

        let mut config = match kind {
            Some(kind) => Self::new(kind, api_key)?,
            None => {
                let config = Self::from_credential(&api_key)?;
                log::info!(
                    "PLAYGROUND_PROVIDER not set, inferred {} from the credential",
                    config.kind
                );
                config
            }
        };

        if let Some(model) = non_empty("PLAYGROUND_MODEL") {
            config = config.with_model(model);
        }
        if let Some(base_url) = non_empty("PLAYGROUND_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(referer) = non_empty("PLAYGROUND_REFERER") {
            config.attribution.referer = referer;
        }
        if let Some(title) = non_empty("PLAYGROUND_TITLE") {
            config.attribution.title = title;
        }
        if let Some(timeout) = non_empty("PLAYGROUND_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|_| {
                Error::config(format!(
                    "PLAYGROUND_TIMEOUT_SECS must be a whole number of seconds, got '{timeout}'"
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Factory for creating providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from configuration.
    pub fn create(config: &ProviderConfig) -> Result<Arc<dyn CodeProvider>, Error> {
        log::info!(
            "Using {} provider with model {}",
            config.kind,
            config.model()
        );

        let provider: Arc<dyn CodeProvider> = match config.kind {
            ProviderKind::Groq => Arc::new(ChatCompletionProvider::new(
                "Groq",
                config.api_key.clone(),
                config.base_url().to_string(),
                config.model().to_string(),
                config.timeout,
            )?),
            ProviderKind::OpenRouter => Arc::new(
                ChatCompletionProvider::new(
                    "OpenRouter",
                    config.api_key.clone(),
                    config.base_url().to_string(),
                    config.model().to_string(),
                    config.timeout,
                )?
                .with_attribution(config.attribution.clone()),
            ),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new_with_base_url(
                config.api_key.clone(),
                config.base_url().to_string(),
                config.model().to_string(),
                config.timeout,
            )?),
        };

        Ok(provider)
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Arc<dyn CodeProvider>, Error> {
        let config = ProviderConfig::from_env()?;
        Self::create(&config)
    }
}
