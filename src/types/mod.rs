//! Core types used throughout the library.

pub mod document;
pub mod image;
pub mod locale;
pub mod prompt;
pub mod request;

// Re-export commonly used types
pub use document::*;
pub use image::*;
pub use locale::*;
pub use prompt::*;
pub use request::*;
