//! Directive operand and variable-reference lexers using logos

use logos::Logos;

/// An operand following a directive keyword
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"\s+")]
pub enum Operand {
    /// `"..."` with the quotes removed; no escapes
    #[regex(r#""[^"]*""#, |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    Quoted(String),

    /// Any run of characters other than whitespace and quotes
    #[regex(r#"[^\s"]+"#, |lex| lex.slice().to_string())]
    Word(String),
}

impl Operand {
    pub fn text(&self) -> &str {
        match self {
            Operand::Quoted(s) | Operand::Word(s) => s,
        }
    }
}

/// Lex the operands of a directive.
///
/// Stops at the first character that cannot start an operand (an
/// unterminated quote), returning `None` for the whole operand list.
pub fn operands(rest: &str) -> Option<Vec<Operand>> {
    Operand::lexer(rest).collect::<Result<Vec<_>, _>>().ok()
}

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[^%]+")]
#[logos(skip r"%")]
enum VarToken {
    #[regex(r"%VAR<[A-Za-z_][A-Za-z0-9_]*>", |lex| {
        let slice = lex.slice();
        slice["%VAR<".len()..slice.len() - 1].to_string()
    })]
    Reference(String),
}

/// A `%VAR<name>` occurrence on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    pub name: String,
    /// Character offset of the `%`
    pub start: usize,
    /// Character offset just past the closing `>`
    pub end: usize,
}

/// Find every `%VAR<name>` reference in a line
pub fn var_refs(line: &str) -> Vec<VarRef> {
    VarToken::lexer(line)
        .spanned()
        .filter_map(|(token, span)| {
            let Ok(VarToken::Reference(name)) = token else {
                return None;
            };
            let start = line[..span.start].chars().count();
            let end = start + line[span].chars().count();
            Some(VarRef { name, start, end })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_and_bare_operands() {
        let ops = operands(r#" "mathlib"  extra"#).unwrap();
        assert_eq!(
            ops,
            vec![Operand::Quoted("mathlib".into()), Operand::Word("extra".into())]
        );
    }

    #[test]
    fn test_empty_quotes() {
        assert_eq!(operands(r#""""#).unwrap(), vec![Operand::Quoted(String::new())]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(operands(r#" "mathlib"#).is_none());
    }

    #[test]
    fn test_no_operands() {
        assert_eq!(operands("   ").unwrap(), Vec::new());
    }

    #[test]
    fn test_var_refs_positions() {
        let refs = var_refs("OUT %VAR<x> %VAR<total_2>");
        assert_eq!(
            refs,
            vec![
                VarRef { name: "x".into(), start: 4, end: 11 },
                VarRef { name: "total_2".into(), start: 12, end: 25 },
            ]
        );
    }

    #[test]
    fn test_var_refs_reject_bad_identifiers() {
        assert!(var_refs("OUT %VAR<1x> %VAR<> %VAR<a-b> VAR<x>").is_empty());
    }

    #[test]
    fn test_var_refs_after_percent_runs() {
        let refs = var_refs("%%VAR<y>");
        assert_eq!(refs, vec![VarRef { name: "y".into(), start: 1, end: 8 }]);
    }

    #[test]
    fn test_var_refs_count_characters() {
        let refs = var_refs("OUT \"é\" %VAR<x>");
        assert_eq!(refs[0].start, 8);
        assert_eq!(refs[0].end, 15);
    }
}
