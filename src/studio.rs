//! Ties a provider to a session: the code panel's "generate" button.

use std::sync::Arc;

use crate::dispatch::generate_with;
use crate::preview::{GenerationOutcome, GenerationTicket, PreviewSurface, Session};
use crate::{CodeProvider, Error, GeneratedDocument, GenerationRequest, ReferenceImage};

/// A configured provider plus the session it writes into.
pub struct Studio<S> {
    provider: Arc<dyn CodeProvider>,
    session: Session<S>,
}

/// A generation that has been admitted by the session but not yet sent.
/// It owns everything it needs, so it can run on another task.
pub struct PendingGeneration {
    provider: Arc<dyn CodeProvider>,
    request: GenerationRequest,
    ticket: GenerationTicket,
}

/// A finished provider round-trip, waiting to be applied to the session.
#[derive(Debug)]
pub struct CompletedGeneration {
    pub ticket: GenerationTicket,
    pub result: Result<GeneratedDocument, Error>,
}

impl PendingGeneration {
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Call the provider and normalize its answer.
    pub async fn execute(self) -> CompletedGeneration {
        let result = generate_with(self.provider.as_ref(), &self.request).await;
        CompletedGeneration {
            ticket: self.ticket,
            result,
        }
    }
}

impl<S: PreviewSurface> Studio<S> {
    pub fn new(provider: Arc<dyn CodeProvider>, surface: S) -> Self {
        Self {
            provider,
            session: Session::new(surface),
        }
    }

    pub fn provider(&self) -> &dyn CodeProvider {
        self.provider.as_ref()
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    /// Validate the input and reserve the session for a generation.
    ///
    /// The current document, when it has content, is sent along so the
    /// provider modifies it instead of starting over.
    pub fn start_generation(
        &mut self,
        instruction: &str,
        image: Option<ReferenceImage>,
    ) -> Result<PendingGeneration, Error> {
        let mut request = GenerationRequest::new(instruction);
        if let Some(image) = image {
            request = request.with_image(image);
        }
        if !self.session.document().is_blank() {
            request = request.with_existing(self.session.document().clone());
        }
        request.validate()?;

        let ticket = self.session.begin_generation()?;
        Ok(PendingGeneration {
            provider: Arc::clone(&self.provider),
            request,
            ticket,
        })
    }

    /// Apply a finished generation, unless the session has moved on.
    pub fn complete_generation(
        &mut self,
        completed: CompletedGeneration,
    ) -> Result<GenerationOutcome, Error> {
        self.session
            .finish_generation(completed.ticket, completed.result)
    }

    /// Start, execute and apply a generation in one go.
    pub async fn generate(
        &mut self,
        instruction: &str,
        image: Option<ReferenceImage>,
    ) -> Result<GenerationOutcome, Error> {
        let pending = self.start_generation(instruction, image)?;
        let completed = pending.execute().await;
        self.complete_generation(completed)
    }
}
