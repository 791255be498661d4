//! Generate single-file HTML5 games from natural-language instructions.
//!
//! A credential picks the provider (Groq, OpenRouter or Google Gemini), the
//! reply is normalized into one HTML document, and a [`Session`] owns that
//! document together with the sandboxed preview it runs in.

pub mod dispatch;
pub mod error;
pub mod export;
pub mod factory;
pub mod normalize;
pub mod preview;
pub mod provider;
pub mod providers;
pub mod sandbox;
pub mod server;
pub mod studio;
pub mod types;

// Re-export core types for easy usage
pub use dispatch::{generate, generate_with};
pub use error::{Error, InputKind};
pub use export::{export_document, load_document, write_document, EXPORT_FILE_NAME, HTML_CONTENT_TYPE};
pub use factory::{ProviderConfig, ProviderFactory, ProviderKind};
pub use normalize::normalize;
pub use preview::*;
pub use provider::CodeProvider;
pub use providers::*;
pub use sandbox::{SandboxPermission, SandboxPolicy};
pub use server::{HttpResponse, PreviewContext, PreviewServer, SharedSurface};
pub use studio::{CompletedGeneration, PendingGeneration, Studio};
pub use types::*;
