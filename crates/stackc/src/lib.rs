//! StackScript checker - semantic validation for StackScript sources
//!
//! This library validates a StackScript document together with the modules
//! it loads, producing a complete diagnostic set on every pass.
//!
//! ## Architecture
//!
//! The checker is organized into:
//! - **Source** (`source/`): line scanning and directive operand lexing
//! - **Sema** (`sema/`): symbol collection, module resolution, reference checks
//! - **Driver** (`driver/`): per-document passes and the trigger-driven language service
//! - **Keywords** (`keywords`): the opcode table offered as completions
//! - **Common** (`common/`): diagnostics, positions, errors and reporting

pub mod common;
pub mod config;
pub mod driver;
pub mod keywords;
pub mod sema;
pub mod source;

// Re-exports for convenience
pub use common::{CheckError, CheckResult, Diagnostic, DiagnosticReporter, DiagnosticSink, DiagnosticStore, Severity};
pub use config::CheckConfig;
pub use driver::{Analysis, Document, LanguageService, SourceDocument, Trigger, analyze};
pub use keywords::KeywordTable;
