//! Reference checks: `CALL` targets, `%VAR<...>` uses and the `HALT` marker

use super::modules::ModuleSet;
use super::symbols::SymbolTable;
use crate::common::{Diagnostic, DiagnosticCode, Range};
use crate::source::{Line, Operand, operands, var_refs};

pub const CALL_KEYWORD: &str = "CALL";
pub const HALT_KEYWORD: &str = "HALT";

/// Outcome of resolving a `CALL` target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResolution {
    Resolved,
    Undefined(String),
    ModuleNotLoaded(String),
    NotExported { module: String, local: String },
}

impl CallResolution {
    fn message(&self) -> Option<String> {
        match self {
            CallResolution::Resolved => None,
            CallResolution::Undefined(name) => Some(format!("Undefined function: {name}")),
            CallResolution::ModuleNotLoaded(module) => Some(format!("Module not loaded: {module}")),
            CallResolution::NotExported { local, .. } => {
                Some(format!("Function not exported by module: {local}"))
            }
        }
    }
}

/// Checks references against the symbols and modules of one pass
pub struct ReferenceChecker<'a> {
    symbols: &'a SymbolTable,
    modules: &'a ModuleSet,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        modules: &'a ModuleSet,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            symbols,
            modules,
            diagnostics,
        }
    }

    pub fn check_calls(&mut self, lines: &[Line<'_>]) {
        for line in lines.iter().filter(|l| l.starts_with(CALL_KEYWORD)) {
            let Some(target) = parse_call(line.trimmed) else {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::Syntax,
                    line.span(),
                    "Invalid CALL syntax. Expected CALL [module.]function",
                ));
                continue;
            };

            if let Some(message) = self.resolve_call(&target).message() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::Resolution,
                    line.span(),
                    message,
                ));
            }
        }
    }

    /// Resolve a `CALL` target, telling an unloaded module apart from a
    /// loaded module that lacks the function
    pub fn resolve_call(&self, target: &str) -> CallResolution {
        if self.symbols.lookup_function(target).is_some() {
            return CallResolution::Resolved;
        }
        match target.rsplit_once('.') {
            Some((module, _)) if !self.modules.contains(module) => {
                CallResolution::ModuleNotLoaded(module.to_string())
            }
            Some((module, local)) => CallResolution::NotExported {
                module: module.to_string(),
                local: local.to_string(),
            },
            None => CallResolution::Undefined(target.to_string()),
        }
    }

    /// Check every `%VAR<name>` against the variables of the whole document
    pub fn check_variables(&mut self, lines: &[Line<'_>]) {
        for line in lines {
            for var in var_refs(line.raw) {
                if self.symbols.lookup_variable(&var.name).is_none() {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::Resolution,
                        Range::on_line(line.index, var.start, var.end),
                        format!("Undefined variable: {}", var.name),
                    ));
                }
            }
        }
    }

    /// Warn on the last line when `HALT` appears nowhere in the text
    pub fn check_halt(&mut self, text: &str, lines: &[Line<'_>]) {
        if text.contains(HALT_KEYWORD) {
            return;
        }
        let range = lines
            .last()
            .map_or_else(|| Range::on_line(0, 0, 0), Line::span);
        self.diagnostics.push(Diagnostic::warning(
            DiagnosticCode::Style,
            range,
            "No HALT instruction found",
        ));
    }
}

/// Extract the target of a trimmed `CALL` line.
///
/// The first operand must be made of word characters and dots; further
/// operands are ignored.
pub fn parse_call(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix(CALL_KEYWORD)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    match operands(rest)?.first()? {
        Operand::Word(target) if target.chars().all(is_target_char) => Some(target.clone()),
        _ => None,
    }
}

fn is_target_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::symbols::Symbol;
    use crate::source::scan_lines;
    use pretty_assertions::assert_eq;

    fn table(functions: &[&str], variables: &[&str]) -> SymbolTable {
        let mut symbols = SymbolTable::new();
        for name in functions {
            match name.split_once('.') {
                Some((module, local)) => symbols.define(Symbol::qualified(module, local)),
                None => symbols.define(Symbol::function(*name)),
            };
        }
        for name in variables {
            symbols.define(Symbol::variable(*name));
        }
        symbols
    }

    fn check(text: &str, symbols: &SymbolTable, modules: &ModuleSet) -> Vec<Diagnostic> {
        let lines = scan_lines(text);
        let mut diagnostics = Vec::new();
        let mut checker = ReferenceChecker::new(symbols, modules, &mut diagnostics);
        checker.check_calls(&lines);
        checker.check_variables(&lines);
        checker.check_halt(text, &lines);
        diagnostics
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_parse_call() {
        assert_eq!(parse_call("CALL greet"), Some("greet".to_string()));
        assert_eq!(parse_call("CALL  math.add  extra"), Some("math.add".to_string()));
        assert_eq!(parse_call("CALL"), None);
        assert_eq!(parse_call("CALL greet-me"), None);
        assert_eq!(parse_call("CALL \"greet\""), None);
        assert_eq!(parse_call("CALLgreet"), None);
    }

    #[test]
    fn test_defined_call() {
        let symbols = table(&["greet"], &[]);
        assert!(check("CALL greet\nHALT", &symbols, &ModuleSet::new()).is_empty());
    }

    #[test]
    fn test_undefined_call() {
        let diagnostics = check("CALL greet\nHALT", &SymbolTable::new(), &ModuleSet::new());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::error(
                DiagnosticCode::Resolution,
                Range::on_line(0, 0, 10),
                "Undefined function: greet",
            )]
        );
    }

    #[test]
    fn test_invalid_call_syntax() {
        let diagnostics = check("  CALL\nHALT", &SymbolTable::new(), &ModuleSet::new());
        assert_eq!(
            messages(&diagnostics),
            vec!["Invalid CALL syntax. Expected CALL [module.]function"]
        );
        assert_eq!(diagnostics[0].code, DiagnosticCode::Syntax);
    }

    #[test]
    fn test_module_not_loaded() {
        let diagnostics = check("CALL unknown.fn\nHALT", &SymbolTable::new(), &ModuleSet::new());
        assert_eq!(messages(&diagnostics), vec!["Module not loaded: unknown"]);
    }

    #[test]
    fn test_resolve_call_kinds() {
        let symbols = table(&["main", "math.add"], &[]);
        let modules = ModuleSet::new();
        let checker_diagnostics = &mut Vec::new();
        let checker = ReferenceChecker::new(&symbols, &modules, checker_diagnostics);

        assert_eq!(checker.resolve_call("main"), CallResolution::Resolved);
        assert_eq!(checker.resolve_call("math.add"), CallResolution::Resolved);
        assert_eq!(
            checker.resolve_call("io.print"),
            CallResolution::ModuleNotLoaded("io".to_string())
        );
        assert_eq!(
            checker.resolve_call("nope"),
            CallResolution::Undefined("nope".to_string())
        );
    }

    #[test]
    fn test_variable_reference_range() {
        let diagnostics = check("  OUT %VAR<x> %VAR<y>\nHALT", &table(&[], &["y"]), &ModuleSet::new());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::error(
                DiagnosticCode::Resolution,
                Range::on_line(0, 6, 13),
                "Undefined variable: x",
            )]
        );
    }

    #[test]
    fn test_every_unresolved_occurrence_is_reported() {
        let diagnostics = check("OUT %VAR<x>\nOUT %VAR<x>\nHALT", &SymbolTable::new(), &ModuleSet::new());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(1, 4, 11));
    }

    #[test]
    fn test_missing_halt_anchors_last_line() {
        let diagnostics = check("PUSH 1\nOUT", &SymbolTable::new(), &ModuleSet::new());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::warning(
                DiagnosticCode::Style,
                Range::on_line(1, 0, 3),
                "No HALT instruction found",
            )]
        );
    }

    #[test]
    fn test_halt_substring_anywhere_counts() {
        let diagnostics = check("OUT \"HALTING\"", &SymbolTable::new(), &ModuleSet::new());
        assert!(diagnostics.is_empty());
    }
}
