//! Error types and diagnostic reporting

use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use thiserror::Error;

use super::{Diagnostic, Position, Severity};

/// Host-level failure outside a validation pass
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render diagnostics: {0}")]
    Render(#[from] codespan_reporting::files::Error),
}

impl CheckError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

pub type CheckResult<T> = Result<T, CheckError>;

/// Diagnostic reporter for pretty terminal output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(choice: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(choice),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Emit diagnostics for a file to stderr
    pub fn report(&self, file_id: usize, diagnostics: &[Diagnostic]) -> CheckResult<()> {
        let mut writer = self.writer.lock();
        self.emit(&mut writer, file_id, diagnostics)
    }

    /// Render diagnostics for a file without color
    pub fn render(&self, file_id: usize, diagnostics: &[Diagnostic]) -> CheckResult<String> {
        let mut buffer = Buffer::no_color();
        self.emit(&mut buffer, file_id, diagnostics)?;
        Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
    }

    fn emit(
        &self,
        writer: &mut dyn WriteColor,
        file_id: usize,
        diagnostics: &[Diagnostic],
    ) -> CheckResult<()> {
        for diagnostic in diagnostics {
            let report = self.to_report(file_id, diagnostic);
            term::emit(writer, &self.config, &self.files, &report)?;
        }
        Ok(())
    }

    fn to_report(&self, file_id: usize, diagnostic: &Diagnostic) -> Report<usize> {
        let report = match diagnostic.severity {
            Severity::Error => Report::error(),
            Severity::Warning => Report::warning(),
        }
        .with_message(diagnostic.message.clone())
        .with_code(diagnostic.code.as_str());

        let start = self.byte_offset(file_id, diagnostic.range.start);
        let end = self.byte_offset(file_id, diagnostic.range.end);
        match (start, end) {
            (Some(start), Some(end)) => {
                report.with_labels(vec![Label::primary(file_id, start..end.max(start))])
            }
            _ => report,
        }
    }

    /// Convert a line/character position into a byte offset into the file
    fn byte_offset(&self, file_id: usize, position: Position) -> Option<usize> {
        let file = self.files.get(file_id).ok()?;
        let range = self.files.line_range(file_id, position.line).ok()?;
        let line = file.source()[range.clone()].trim_end_matches(['\n', '\r']);
        let offset = line
            .char_indices()
            .nth(position.character)
            .map_or(line.len(), |(i, _)| i);
        Some(range.start + offset)
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
