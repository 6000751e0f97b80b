//! Validation pass orchestration
//!
//! A pass runs, in order: label collection, `EXTERN` placement, `SET`
//! collection, module resolution, `CALL` checks, variable checks and the
//! `HALT` check. Each pass starts from empty state; nothing is cached
//! between passes.

mod service;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::{CheckError, CheckResult, Diagnostic, DocumentId, Severity};
use crate::config::CheckConfig;
use crate::sema::{ModuleResolver, ModuleSet, ReferenceChecker, SymbolCollector, SymbolTable};
use crate::source::scan_lines;

pub use service::{LanguageService, Trigger};

/// A document as provided by the host
pub trait Document {
    fn id(&self) -> &DocumentId;

    /// Location on disk; modules resolve relative to its directory
    fn path(&self) -> Option<&Path>;

    fn language_id(&self) -> &str;

    fn text(&self) -> &str;
}

/// An owned document
#[derive(Debug, Clone)]
pub struct SourceDocument {
    id: DocumentId,
    path: Option<PathBuf>,
    language_id: String,
    text: String,
}

impl SourceDocument {
    /// An in-memory document with no path and the default language id
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(id),
            path: None,
            language_id: CheckConfig::default().language_id,
            text: text.into(),
        }
    }

    /// Read a document from disk
    pub fn from_path(path: impl Into<PathBuf>) -> CheckResult<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| CheckError::read(&path, e))?;
        Ok(Self::new(path.display().to_string(), text).with_path(path))
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    /// Replace the text, as after an edit
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Document for SourceDocument {
    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Result of one validation pass
#[derive(Debug)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
    pub modules: ModuleSet,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }
}

/// Working state of one pass over one document
pub struct ValidationPass<'a, D: Document + ?Sized> {
    document: &'a D,
    config: &'a CheckConfig,
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, D: Document + ?Sized> ValidationPass<'a, D> {
    pub fn new(document: &'a D, config: &'a CheckConfig) -> Self {
        Self {
            document,
            config,
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn run(mut self) -> Analysis {
        let text = self.document.text();
        let lines = scan_lines(text);
        debug!(document = %self.document.id(), lines = lines.len(), "starting validation pass");

        let mut collector = SymbolCollector::new(&mut self.symbols, &mut self.diagnostics);
        collector.collect_labels(&lines);
        collector.check_extern_placement(&lines);
        collector.collect_variables(&lines);

        let base_dir = ModuleResolver::base_dir_for(self.document.path());
        let modules = ModuleResolver::new(base_dir, self.config).resolve(
            &lines,
            &mut self.symbols,
            &mut self.diagnostics,
        );

        let mut checker = ReferenceChecker::new(&self.symbols, &modules, &mut self.diagnostics);
        checker.check_calls(&lines);
        checker.check_variables(&lines);
        checker.check_halt(text, &lines);

        let analysis = Analysis {
            diagnostics: self.diagnostics,
            symbols: self.symbols,
            modules,
        };

        if self.config.dump_symbols {
            eprintln!("=== Symbols: {} ===", self.document.id());
            eprint!("{}", analysis.symbols);
            for module in analysis.modules.iter() {
                eprintln!("module {} ({:?}): {}", module.name, module.status, module.exports.join(" "));
            }
            eprintln!("=== End Symbols ===\n");
        }

        debug!(
            document = %self.document.id(),
            errors = analysis.error_count(),
            warnings = analysis.warning_count(),
            "validation pass complete"
        );
        analysis
    }
}

/// Run one full validation pass over a document
pub fn analyze<D: Document + ?Sized>(document: &D, config: &CheckConfig) -> Analysis {
    ValidationPass::new(document, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DiagnosticCode, Range};
    use pretty_assertions::assert_eq;

    fn messages(analysis: &Analysis) -> Vec<&str> {
        analysis.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_clean_document() {
        let doc = SourceDocument::new("main", "SET x 5\nOUT %VAR<x>\nHALT");
        let analysis = analyze(&doc, &CheckConfig::default());
        assert!(analysis.diagnostics.is_empty());
        assert!(analysis.symbols.lookup_variable("x").is_some());
    }

    #[test]
    fn test_forward_references_resolve() {
        let doc = SourceDocument::new("main", "OUT %VAR<x>\nCALL later\nHALT\nlater:\nSET x 1");
        let analysis = analyze(&doc, &CheckConfig::default());
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn test_extern_names_are_not_resolvable() {
        let doc = SourceDocument::new("main", "EXTERN helper\nCALL helper\nHALT");
        let analysis = analyze(&doc, &CheckConfig::default());
        assert_eq!(
            messages(&analysis),
            vec!["EXTERN can only be used in module files", "Undefined function: helper"]
        );
    }

    #[test]
    fn test_checks_are_independent() {
        let text = "SET\nLOAD\nCALL\nCALL x.y\nOUT %VAR<v>";
        let doc = SourceDocument::new("main", text);
        let analysis = analyze(&doc, &CheckConfig::default());

        assert_eq!(
            messages(&analysis),
            vec![
                "SET command missing variable name",
                "Invalid LOAD syntax. Expected LOAD \"modulename\"",
                "Invalid CALL syntax. Expected CALL [module.]function",
                "Module not loaded: x",
                "Undefined variable: v",
                "No HALT instruction found",
            ]
        );
        assert_eq!(analysis.error_count(), 5);
        assert_eq!(analysis.warning_count(), 1);
        let halt = analysis.diagnostics.last().unwrap();
        assert_eq!(halt.code, DiagnosticCode::Style);
        assert_eq!(halt.range, Range::on_line(4, 0, 11));
    }

    #[test]
    fn test_passes_are_deterministic() {
        let doc = SourceDocument::new("main", "CALL a\nCALL b.c\nOUT %VAR<z>");
        let config = CheckConfig::default();
        assert_eq!(analyze(&doc, &config).diagnostics, analyze(&doc, &config).diagnostics);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SourceDocument::from_path("/definitely/not/here.stack").unwrap_err();
        assert!(matches!(err, CheckError::Read { .. }));
    }
}
