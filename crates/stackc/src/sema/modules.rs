//! Module resolution for `LOAD` directives
//!
//! A module `name` is a pair of files next to the entry document:
//! - `<name>.stackm`: metadata, `EXTERN` lines listing exported functions
//! - `<name>.stack`: implementation, label definitions
//!
//! Exports from both files are merged into the symbol table as
//! `<name>.<local>`.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::collector::EXTERN_KEYWORD;
use super::symbols::{Symbol, SymbolTable};
use crate::common::{CheckError, CheckResult, Diagnostic, DiagnosticCode};
use crate::config::CheckConfig;
use crate::source::{Line, Operand, operands, scan_lines};

pub const LOAD_KEYWORD: &str = "LOAD";

/// Load status of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Loaded,
    MissingMetadata,
    MissingImplementation,
    MissingBoth,
    ReadError,
}

/// A module named by a `LOAD` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub metadata_path: PathBuf,
    pub implementation_path: PathBuf,
    pub status: ModuleStatus,
    /// Local names exported by the module, in discovery order
    pub exports: Vec<String>,
}

/// Modules processed during one pass
#[derive(Debug, Default, Clone)]
pub struct ModuleSet {
    modules: Vec<Module>,
    names: HashSet<String>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `LOAD` for this name was seen, whatever its outcome
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn insert(&mut self, module: Module) {
        self.names.insert(module.name.clone());
        self.modules.push(module);
    }
}

/// Resolves `LOAD` directives relative to the entry document's directory
pub struct ModuleResolver<'a> {
    base_dir: PathBuf,
    config: &'a CheckConfig,
    modules: ModuleSet,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(base_dir: impl Into<PathBuf>, config: &'a CheckConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
            modules: ModuleSet::new(),
        }
    }

    /// Resolve a document's base directory from its path, if it has one
    pub fn base_dir_for(document_path: Option<&Path>) -> PathBuf {
        document_path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Process every `LOAD` line, merging exports into `symbols`
    pub fn resolve(
        mut self,
        lines: &[Line<'_>],
        symbols: &mut SymbolTable,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ModuleSet {
        for line in lines.iter().filter(|l| l.starts_with(LOAD_KEYWORD)) {
            let Some(name) = parse_load(line.trimmed) else {
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::Syntax,
                    line.span(),
                    "Invalid LOAD syntax. Expected LOAD \"modulename\"",
                ));
                continue;
            };

            if self.modules.contains(&name) {
                debug!(module = %name, line = line.index, "module already loaded");
                continue;
            }

            let module = self.load_module(&name, line, symbols, diagnostics);
            debug!(module = %module.name, status = ?module.status, exports = module.exports.len(), "resolved module");
            self.modules.insert(module);
        }
        self.modules
    }

    fn load_module(
        &self,
        name: &str,
        line: &Line<'_>,
        symbols: &mut SymbolTable,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Module {
        let base = self.base_dir.join(name);
        let metadata_path = with_extension(&base, &self.config.metadata_extension);
        let implementation_path = with_extension(&base, &self.config.implementation_extension);

        let mut exports = Vec::new();

        let metadata = read_module_file(&metadata_path);
        match &metadata {
            ModuleFile::Read(text) => exports.extend(metadata_exports(text)),
            ModuleFile::Missing => diagnostics.push(Diagnostic::error(
                DiagnosticCode::Resolution,
                line.span(),
                format!(
                    "Missing module metadata file: {name}.{}",
                    self.config.metadata_extension
                ),
            )),
            ModuleFile::Failed(err) => diagnostics.push(read_error(line, err)),
        }

        let implementation = read_module_file(&implementation_path);
        match &implementation {
            ModuleFile::Read(text) => exports.extend(implementation_labels(text)),
            ModuleFile::Missing => diagnostics.push(Diagnostic::error(
                DiagnosticCode::Resolution,
                line.span(),
                format!(
                    "Missing module implementation file: {name}.{}",
                    self.config.implementation_extension
                ),
            )),
            ModuleFile::Failed(err) => diagnostics.push(read_error(line, err)),
        }

        let mut seen = HashSet::new();
        exports.retain(|local| seen.insert(local.clone()));
        for local in &exports {
            if symbols.define(Symbol::qualified(name, local)) {
                trace!(module = name, local = %local, "defined export");
            }
        }

        Module {
            name: name.to_string(),
            metadata_path,
            implementation_path,
            status: module_status(&metadata, &implementation),
            exports,
        }
    }
}

/// Extract the module name from a trimmed `LOAD` line.
///
/// Accepts `LOAD "name"` and, for older sources, `LOAD name` with a single
/// bare operand.
pub fn parse_load(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix(LOAD_KEYWORD)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let ops = operands(rest)?;
    match ops.as_slice() {
        [Operand::Quoted(name), ..] if !name.is_empty() => Some(name.clone()),
        [Operand::Word(name)] => Some(name.clone()),
        _ => None,
    }
}

/// Local names declared by `EXTERN` lines of a metadata file
fn metadata_exports(text: &str) -> Vec<String> {
    scan_lines(text)
        .iter()
        .filter_map(|line| line.trimmed.strip_prefix(EXTERN_KEYWORD))
        .flat_map(|rest| rest.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

/// Label names defined in an implementation file
fn implementation_labels(text: &str) -> Vec<String> {
    scan_lines(text)
        .iter()
        .filter_map(|line| line.label().map(str::to_string))
        .collect()
}

/// Outcome of reading one module file
enum ModuleFile {
    Read(String),
    Missing,
    Failed(CheckError),
}

fn read_module_file(path: &Path) -> ModuleFile {
    if !path.exists() {
        return ModuleFile::Missing;
    }
    match read_text(path) {
        Ok(text) => ModuleFile::Read(text),
        Err(err) => ModuleFile::Failed(err),
    }
}

fn read_text(path: &Path) -> CheckResult<String> {
    fs::read_to_string(path).map_err(|e| CheckError::read(path, e))
}

fn read_error(line: &Line<'_>, err: &CheckError) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::Io,
        line.span(),
        format!("Error reading module: {err}"),
    )
}

fn module_status(metadata: &ModuleFile, implementation: &ModuleFile) -> ModuleStatus {
    match (metadata, implementation) {
        (ModuleFile::Failed(_), _) | (_, ModuleFile::Failed(_)) => ModuleStatus::ReadError,
        (ModuleFile::Missing, ModuleFile::Missing) => ModuleStatus::MissingBoth,
        (ModuleFile::Missing, ModuleFile::Read(_)) => ModuleStatus::MissingMetadata,
        (ModuleFile::Read(_), ModuleFile::Missing) => ModuleStatus::MissingImplementation,
        (ModuleFile::Read(_), ModuleFile::Read(_)) => ModuleStatus::Loaded,
    }
}

/// Append `.ext` without replacing any dot already in the module name
fn with_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
