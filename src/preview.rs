//! Preview lifecycle: the owned session record behind the editor and the
//! sandboxed surface.

use crate::error::{Error, InputKind};
use crate::normalize::normalize;
use crate::types::GeneratedDocument;

/// Where the preview currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Nothing loaded or shown.
    Idle,
    /// The document is injected into the surface and visible.
    Running,
    /// Explicitly stopped; the surface is blank.
    Stopped,
}

/// The isolated surface a document is executed in.
///
/// Injection is treated as instantaneous: there is no partially loaded state.
pub trait PreviewSurface {
    /// Replace the surface content with a document.
    fn load(&mut self, document: &str);

    /// Discard whatever the surface is showing.
    fn blank(&mut self);
}

/// Proof that a generation was started, checked when its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

/// What happened to a finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The document was replaced and is running.
    Applied,
    /// The provider answered without usable HTML; nothing changed.
    Empty,
    /// The session moved on (cleared or abandoned) while the request was in
    /// flight; the result was dropped.
    Discarded,
}

/// Single owner of the current document, preview state and surface.
#[derive(Debug)]
pub struct Session<S> {
    document: GeneratedDocument,
    state: PreviewState,
    surface: S,
    epoch: u64,
    in_flight: bool,
}

impl<S: PreviewSurface> Session<S> {
    pub fn new(surface: S) -> Self {
        Self {
            document: GeneratedDocument::empty(),
            state: PreviewState::Idle,
            surface,
            epoch: 0,
            in_flight: false,
        }
    }

    pub fn document(&self) -> &GeneratedDocument {
        &self.document
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a generation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Replace the held document with edited or pasted text. The surface
    /// keeps showing the previous run until `run` is called again.
    pub fn set_document(&mut self, document: impl Into<GeneratedDocument>) {
        self.document = document.into();
    }

    /// Inject the held document into the surface.
    pub fn run(&mut self) -> Result<(), Error> {
        if self.document.is_blank() {
            log::warn!("Run requested with an empty document");
            return Err(Error::EmptyInput(InputKind::Document));
        }

        self.surface.load(self.document.as_str());
        self.state = PreviewState::Running;
        log::info!("Preview running ({} bytes)", self.document.len());
        Ok(())
    }

    /// Blank the surface. Does nothing when nothing is running.
    pub fn stop(&mut self) {
        if self.state != PreviewState::Running {
            return;
        }

        self.surface.blank();
        self.state = PreviewState::Stopped;
        log::info!("Preview stopped");
    }

    /// Discard the document after asking for confirmation.
    ///
    /// Stops the preview and invalidates any generation in flight. Returns
    /// whether anything was cleared.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }

        self.document = GeneratedDocument::empty();
        if self.state == PreviewState::Running {
            self.surface.blank();
        }
        self.state = PreviewState::Idle;
        self.abandon_generation();
        log::info!("Session cleared");
        true
    }

    /// Start a generation; only one may be outstanding.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, Error> {
        if self.in_flight {
            return Err(Error::Busy);
        }

        self.in_flight = true;
        Ok(GenerationTicket { epoch: self.epoch })
    }

    /// Make the outstanding generation stale so its result is dropped.
    pub fn abandon_generation(&mut self) {
        self.epoch += 1;
    }

    /// Apply the result of a generation started with `ticket`.
    ///
    /// Failures and stale results leave the document and preview untouched.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GeneratedDocument, Error>,
    ) -> Result<GenerationOutcome, Error> {
        self.in_flight = false;

        if ticket.epoch != self.epoch {
            log::info!("Dropping result of a generation started before the session changed");
            return Ok(GenerationOutcome::Discarded);
        }

        let document = result?;
        if document.is_blank() {
            log::warn!("Generation produced no usable document");
            return Ok(GenerationOutcome::Empty);
        }

        self.document = document;
        self.surface.load(self.document.as_str());
        self.state = PreviewState::Running;
        log::info!("Generated document applied ({} bytes)", self.document.len());
        Ok(GenerationOutcome::Applied)
    }

    /// Apply raw provider text, normalizing it first.
    pub fn finish_generation_raw(
        &mut self,
        ticket: GenerationTicket,
        result: Result<String, Error>,
    ) -> Result<GenerationOutcome, Error> {
        self.finish_generation(ticket, result.map(|raw| normalize(&raw)))
    }
}

/// Surface that remembers what it was asked to show. Useful when there is no
/// real display, e.g. for one-shot CLI runs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSurface {
    pub content: Option<String>,
    pub loads: usize,
    pub blanks: usize,
}

impl PreviewSurface for RecordingSurface {
    fn load(&mut self, document: &str) {
        self.content = Some(document.to_string());
        self.loads += 1;
    }

    fn blank(&mut self) {
        self.content = None;
        self.blanks += 1;
    }
}
