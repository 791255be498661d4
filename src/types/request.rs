use super::document::GeneratedDocument;
use super::image::ReferenceImage;
use crate::error::{Error, InputKind};

/// What the user asked for: an instruction, an optional reference image and,
/// when modifying, the code currently held by the session.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub instruction: String,
    pub reference_image: Option<ReferenceImage>,
    pub existing_document: Option<GeneratedDocument>,
}

impl GenerationRequest {
    /// Create a request from a free-text instruction.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            reference_image: None,
            existing_document: None,
        }
    }

    /// Attach a reference image.
    pub fn with_image(mut self, image: ReferenceImage) -> Self {
        self.reference_image = Some(image);
        self
    }

    /// Ask for a modification of an existing document.
    pub fn with_existing(mut self, document: GeneratedDocument) -> Self {
        self.existing_document = Some(document);
        self
    }

    /// The existing document, if it has any content worth modifying.
    pub fn existing(&self) -> Option<&GeneratedDocument> {
        self.existing_document.as_ref().filter(|doc| !doc.is_blank())
    }

    /// Reject requests with neither an instruction nor a reference image.
    pub fn validate(&self) -> Result<(), Error> {
        if self.instruction.trim().is_empty() && self.reference_image.is_none() {
            return Err(Error::EmptyInput(InputKind::Instruction));
        }
        Ok(())
    }
}
