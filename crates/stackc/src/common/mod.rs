//! Common infrastructure shared by the scanner, the checks and the hosts

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink, DiagnosticStore, DocumentId, Severity};
pub use error::{CheckError, CheckResult, DiagnosticReporter};
pub use span::{Position, Range};
