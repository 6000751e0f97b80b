//! Opcode keyword table used for completion candidates

use std::collections::HashSet;
use std::fmt;

/// Category an opcode belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Arithmetic,
    Stack,
    ControlFlow,
    Io,
    FileSystem,
    Memory,
    Random,
    System,
    Variables,
    Module,
    Debug,
}

impl KeywordCategory {
    pub fn label(self) -> &'static str {
        match self {
            KeywordCategory::Arithmetic => "Arithmetic",
            KeywordCategory::Stack => "Stack",
            KeywordCategory::ControlFlow => "Control flow",
            KeywordCategory::Io => "I/O",
            KeywordCategory::FileSystem => "File system",
            KeywordCategory::Memory => "Memory",
            KeywordCategory::Random => "Random",
            KeywordCategory::System => "System",
            KeywordCategory::Variables => "Variables",
            KeywordCategory::Module => "Module",
            KeywordCategory::Debug => "Debug",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An opcode and its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub token: String,
    pub category: KeywordCategory,
}

/// A completion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub detail: String,
}

const STANDARD: &[(&str, KeywordCategory)] = &[
    ("ADD", KeywordCategory::Arithmetic),
    ("SUB", KeywordCategory::Arithmetic),
    ("MUL", KeywordCategory::Arithmetic),
    ("DIV", KeywordCategory::Arithmetic),
    ("EXP", KeywordCategory::Arithmetic),
    ("PUSH", KeywordCategory::Stack),
    ("POP", KeywordCategory::Stack),
    ("SPREAD", KeywordCategory::Stack),
    ("BOTOP", KeywordCategory::Stack),
    ("CLEAR", KeywordCategory::Stack),
    ("COPY", KeywordCategory::Stack),
    ("DUP", KeywordCategory::Stack),
    ("SPUSH", KeywordCategory::Stack),
    ("PUD", KeywordCategory::Stack),
    ("SWAP", KeywordCategory::Stack),
    ("S-SWAP", KeywordCategory::Stack),
    ("TOP", KeywordCategory::Stack),
    ("OUT", KeywordCategory::Io),
    ("OUTV", KeywordCategory::Io),
    ("SPOUTV", KeywordCategory::Io),
    ("READ", KeywordCategory::Io),
    ("HALT", KeywordCategory::ControlFlow),
    ("CALL", KeywordCategory::ControlFlow),
    ("JMP", KeywordCategory::ControlFlow),
    ("JMPGT", KeywordCategory::ControlFlow),
    ("JMPLT", KeywordCategory::ControlFlow),
    ("JMPEQ", KeywordCategory::ControlFlow),
    ("ENDFUNC", KeywordCategory::ControlFlow),
    ("READFILE", KeywordCategory::FileSystem),
    ("WRITEFILE", KeywordCategory::FileSystem),
    ("APPENDFILE", KeywordCategory::FileSystem),
    ("DELETEFILE", KeywordCategory::FileSystem),
    ("CREATEFILE", KeywordCategory::FileSystem),
    ("CREATEFOLDER", KeywordCategory::FileSystem),
    ("DELETEFOLDER", KeywordCategory::FileSystem),
    ("SWAPMEM", KeywordCategory::Memory),
    ("CHOICE-1", KeywordCategory::Random),
    ("CHOICE-2", KeywordCategory::Random),
    ("RANDINT", KeywordCategory::Random),
    ("RANDOM", KeywordCategory::Random),
    ("SYSTEM", KeywordCategory::System),
    ("SET", KeywordCategory::Variables),
    ("LOAD", KeywordCategory::Module),
    ("EXTERN", KeywordCategory::Module),
    ("BREAKPOINT", KeywordCategory::Debug),
];

/// Ordered opcode table; each token appears once
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    keywords: Vec<Keyword>,
}

impl KeywordTable {
    /// Build a table, keeping the first entry for a repeated token
    pub fn new(keywords: impl IntoIterator<Item = Keyword>) -> Self {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .filter(|k| seen.insert(k.token.clone()))
            .collect();
        Self { keywords }
    }

    /// The StackScript opcode set
    pub fn standard() -> Self {
        Self::new(STANDARD.iter().map(|&(token, category)| Keyword {
            token: token.to_string(),
            category,
        }))
    }

    pub fn get(&self, token: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.token == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn completions(&self) -> Vec<CompletionItem> {
        self.keywords
            .iter()
            .map(|k| CompletionItem {
                label: k.token.clone(),
                detail: format!("StackScript {}", k.category),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REQUIRED: &[&str] = &[
        "ADD", "SUB", "MUL", "DIV", "EXP", "PUSH", "POP", "OUT", "HALT", "CALL", "READ",
        "SPREAD", "JMP", "JMPGT", "JMPLT", "JMPEQ", "BOTOP", "CLEAR", "COPY", "DUP", "SPUSH",
        "PUD", "SWAP", "SPOUTV", "S-SWAP", "READFILE", "WRITEFILE", "APPENDFILE", "DELETEFILE",
        "CREATEFILE", "CREATEFOLDER", "DELETEFOLDER", "SWAPMEM", "CHOICE-1", "CHOICE-2",
        "RANDINT", "RANDOM", "SYSTEM", "OUTV", "TOP", "LOAD", "ENDFUNC", "BREAKPOINT",
    ];

    #[test]
    fn test_standard_table_covers_opcodes() {
        let table = KeywordTable::standard();
        for token in REQUIRED {
            assert!(table.get(token).is_some(), "missing opcode {token}");
        }
    }

    #[test]
    fn test_standard_table_has_no_duplicates() {
        let table = KeywordTable::standard();
        assert_eq!(table.len(), STANDARD.len());
    }

    #[test]
    fn test_repeated_token_keeps_first() {
        let table = KeywordTable::new([
            Keyword { token: "TOP".into(), category: KeywordCategory::Stack },
            Keyword { token: "TOP".into(), category: KeywordCategory::Debug },
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("TOP").unwrap().category, KeywordCategory::Stack);
    }

    #[test]
    fn test_completions() {
        let table = KeywordTable::standard();
        let items = table.completions();
        assert_eq!(items.len(), table.len());
        assert_eq!(
            items[0],
            CompletionItem { label: "ADD".into(), detail: "StackScript Arithmetic".into() }
        );
        let call = items.iter().find(|i| i.label == "CALL").unwrap();
        assert_eq!(call.detail, "StackScript Control flow");
    }
}
