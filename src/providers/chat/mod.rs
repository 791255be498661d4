//! Chat-completion providers (Groq and OpenRouter share this schema).

pub mod client;
pub mod types;

pub use client::{Attribution, ChatCompletionProvider};
