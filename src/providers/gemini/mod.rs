//! Gemini via the Generative Language API (structured multi-part schema).

pub mod client;
pub mod types;

pub use client::GeminiProvider;
