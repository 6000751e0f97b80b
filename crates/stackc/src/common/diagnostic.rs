//! Diagnostics produced by a validation pass and the sink they are published to

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::Range;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Class of finding a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Malformed `LOAD`, `CALL` or `SET`, or a misplaced `EXTERN`
    Syntax,
    /// Missing module file, unloaded module, unknown function or variable
    Resolution,
    /// A module file exists but could not be read
    Io,
    /// Style findings such as a missing `HALT`
    Style,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::Syntax => "syntax",
            DiagnosticCode::Resolution => "resolution",
            DiagnosticCode::Io => "io",
            DiagnosticCode::Style => "style",
        }
    }
}

/// A positioned, severity-tagged validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.range, self.severity, self.message)
    }
}

/// Identity of a document as seen by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Path> for DocumentId {
    fn from(path: &Path) -> Self {
        Self(path.display().to_string())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiver of published diagnostic sets.
///
/// Every publish replaces the previous set for the same document.
pub trait DiagnosticSink {
    fn publish(&mut self, document: &DocumentId, diagnostics: Vec<Diagnostic>);

    /// Drop the set for a document that is no longer tracked
    fn clear(&mut self, document: &DocumentId) {
        self.publish(document, Vec::new());
    }
}

/// In-memory diagnostic store keyed by document identity
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    sets: HashMap<DocumentId, Vec<Diagnostic>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, document: &DocumentId) -> Option<&[Diagnostic]> {
        self.sets.get(document).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl DiagnosticSink for DiagnosticStore {
    fn publish(&mut self, document: &DocumentId, diagnostics: Vec<Diagnostic>) {
        self.sets.insert(document.clone(), diagnostics);
    }

    fn clear(&mut self, document: &DocumentId) {
        self.sets.remove(document);
    }
}
