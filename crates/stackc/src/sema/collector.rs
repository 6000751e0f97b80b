//! Symbol collection for the entry document
//!
//! Collects labels as functions and `SET` targets as variables, and flags
//! `EXTERN` declarations, which belong in module metadata files only.

use tracing::trace;

use super::symbols::{Symbol, SymbolTable};
use crate::common::{Diagnostic, DiagnosticCode};
use crate::source::Line;

pub const EXTERN_KEYWORD: &str = "EXTERN";
pub const SET_KEYWORD: &str = "SET";

/// Builds the entry document's local symbols
pub struct SymbolCollector<'a> {
    symbols: &'a mut SymbolTable,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> SymbolCollector<'a> {
    pub fn new(symbols: &'a mut SymbolTable, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            symbols,
            diagnostics,
        }
    }

    /// Collect local labels across the whole document
    pub fn collect_labels(&mut self, lines: &[Line<'_>]) {
        for line in lines {
            if let Some(name) = line.label() {
                if self.symbols.define(Symbol::function(name)) {
                    trace!(name, line = line.index, "defined label");
                }
            }
        }
    }

    /// Flag every `EXTERN` line; its names are never defined here
    pub fn check_extern_placement(&mut self, lines: &[Line<'_>]) {
        for line in lines.iter().filter(|l| l.starts_with(EXTERN_KEYWORD)) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::Syntax,
                line.span(),
                "EXTERN can only be used in module files",
            ));
        }
    }

    /// Collect `SET <name> ...` declarations
    pub fn collect_variables(&mut self, lines: &[Line<'_>]) {
        for line in lines.iter().filter(|l| l.starts_with(SET_KEYWORD)) {
            match line.trimmed.split_whitespace().nth(1) {
                Some(name) => {
                    if self.symbols.define(Symbol::variable(name)) {
                        trace!(name, line = line.index, "defined variable");
                    }
                }
                None => self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::Syntax,
                    line.span(),
                    "SET command missing variable name",
                )),
            }
        }
    }
}
