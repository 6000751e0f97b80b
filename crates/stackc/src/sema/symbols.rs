//! Symbol table

use std::collections::HashMap;
use std::fmt;

/// A symbol in the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Module the symbol was imported from, for qualified names
    pub module: Option<String>,
}

impl Symbol {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Function,
            module: None,
        }
    }

    /// A function exported by a module, named `<module>.<local>`
    pub fn qualified(module: &str, local: &str) -> Self {
        Self {
            name: format!("{module}.{local}"),
            kind: SymbolKind::Function,
            module: Some(module.to_string()),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable,
            module: None,
        }
    }
}

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Variable => write!(f, "variable"),
        }
    }
}

/// Name-keyed set of symbols with first-definition-wins semantics.
///
/// Functions and variables live in separate namespaces; each keeps
/// definition order.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    functions: Namespace,
    variables: Namespace,
}

#[derive(Debug, Default, Clone)]
struct Namespace {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl Namespace {
    fn define(&mut self, symbol: Symbol) -> bool {
        if self.index.contains_key(&symbol.name) {
            return false;
        }
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol, returning `false` if the name was already taken
    pub fn define(&mut self, symbol: Symbol) -> bool {
        match symbol.kind {
            SymbolKind::Function => self.functions.define(symbol),
            SymbolKind::Variable => self.variables.define(symbol),
        }
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Symbol> {
        self.functions.lookup(name)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Symbol> {
        self.variables.lookup(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.functions.symbols.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.variables.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.symbols.len() + self.variables.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.functions().chain(self.variables()) {
            match &symbol.module {
                Some(module) => writeln!(f, "{} {} (from {})", symbol.kind, symbol.name, module)?,
                None => writeln!(f, "{} {}", symbol.kind, symbol.name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_definition_wins() {
        let mut table = SymbolTable::new();
        assert!(table.define(Symbol::qualified("math", "add")));
        assert!(!table.define(Symbol::function("math.add")));

        let symbol = table.lookup_function("math.add").unwrap();
        assert_eq!(symbol.module.as_deref(), Some("math"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_namespaces_are_separate() {
        let mut table = SymbolTable::new();
        assert!(table.define(Symbol::variable("count")));
        assert!(table.define(Symbol::function("count")));

        assert!(table.lookup_variable("count").is_some());
        assert!(table.lookup_function("count").is_some());
        assert!(table.lookup_variable("missing").is_none());
    }

    #[test]
    fn test_definition_order_is_kept() {
        let mut table = SymbolTable::new();
        table.define(Symbol::function("b"));
        table.define(Symbol::function("a"));
        table.define(Symbol::variable("x"));

        assert_eq!(table.to_string(), "function b\nfunction a\nvariable x\n");
    }
}
