use std::fmt;

/// The current program text: a complete single-file HTML document, or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedDocument(String);

impl GeneratedDocument {
    /// Wrap program text as-is (pasted or loaded code is not normalized).
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// An empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing but whitespace to run.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GeneratedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GeneratedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GeneratedDocument {
    fn from(s: &str) -> Self {
        GeneratedDocument::new(s)
    }
}

impl From<String> for GeneratedDocument {
    fn from(s: String) -> Self {
        GeneratedDocument(s)
    }
}
