//! Saving the current document as a standalone HTML file, and loading one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, InputKind};
use crate::types::GeneratedDocument;

/// Name given to exported documents.
pub const EXPORT_FILE_NAME: &str = "meu-jogo-bytez.html";

/// Content type of exported and served documents.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Write the document into `dir` under [`EXPORT_FILE_NAME`].
pub fn export_document(document: &GeneratedDocument, dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let path = dir.as_ref().join(EXPORT_FILE_NAME);
    write_document(document, &path)?;
    Ok(path)
}

/// Write the document to an explicit path.
pub fn write_document(document: &GeneratedDocument, path: impl AsRef<Path>) -> Result<(), Error> {
    if document.is_blank() {
        return Err(Error::EmptyInput(InputKind::Document));
    }

    let path = path.as_ref();
    fs::write(path, document.as_str())?;
    log::info!("Exported {} bytes to {}", document.len(), path.display());
    Ok(())
}

/// Read a file as the current document, verbatim.
pub fn load_document(path: impl AsRef<Path>) -> Result<GeneratedDocument, Error> {
    let text = fs::read_to_string(path)?;
    Ok(GeneratedDocument::new(text))
}
