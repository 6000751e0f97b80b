//! Source scanning
//!
//! This module turns document text into lines and provides the token
//! grammars used by the directive checks:
//! - `lines`: the line scanner (raw and trimmed forms, 0-based index)
//! - `lexer`: operand and `%VAR<...>` reference lexers built with logos

pub mod lexer;
pub mod lines;

pub use lexer::{Operand, VarRef, operands, var_refs};
pub use lines::{Line, scan_lines};
