//! Provider implementations for the supported generation services.

pub mod chat;
pub mod gemini;

// Re-export commonly used provider types
pub use chat::{Attribution, ChatCompletionProvider};
pub use gemini::GeminiProvider;

use std::time::Duration;

/// HTTP timeout used when the configuration does not set one. Whole games
/// can take a while to come back.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
