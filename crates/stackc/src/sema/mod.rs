//! Semantic analysis
//!
//! Symbol collection, module resolution and reference checking over the
//! lines of one document.

mod collector;
mod modules;
mod references;
mod symbols;

pub use collector::SymbolCollector;
pub use modules::{Module, ModuleResolver, ModuleSet, ModuleStatus, parse_load};
pub use references::{CallResolution, ReferenceChecker, parse_call};
pub use symbols::{Symbol, SymbolKind, SymbolTable};
