//! StackScript checker
//!
//! Usage: stackc [OPTIONS] <inputs>...

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser as ClapParser};
use stackscript_check::common::{DiagnosticReporter, DiagnosticStore};
use stackscript_check::driver::{Document, LanguageService, SourceDocument};
use stackscript_check::{CheckConfig, KeywordTable};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "stackc")]
#[command(author = "StackScript Tools Team")]
#[command(version)]
#[command(about = "Semantic checker for StackScript sources and modules", long_about = None)]
struct Args {
    /// Entry documents to check (.stack)
    #[arg(required_unless_present = "keywords")]
    inputs: Vec<PathBuf>,

    /// Extension of module metadata files
    #[arg(long, default_value = "stackm")]
    metadata_ext: String,

    /// Extension of module implementation files
    #[arg(long, default_value = "stack")]
    implementation_ext: String,

    /// Print the symbol table of each document
    #[arg(long)]
    dump_symbols: bool,

    /// List the opcode keywords and exit
    #[arg(long)]
    keywords: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(args.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "stackc=warn,stackscript_check=warn",
        1 => "stackc=debug,stackscript_check=debug",
        _ => "stackc=trace,stackscript_check=trace",
    }
}

/// Check every input; returns `false` if any document had errors
fn run(args: &Args) -> anyhow::Result<bool> {
    let keywords = KeywordTable::standard();

    if args.keywords {
        for keyword in keywords.iter() {
            println!("{:<14} {}", keyword.token, keyword.category);
        }
        return Ok(true);
    }

    let config = CheckConfig {
        metadata_extension: args.metadata_ext.clone(),
        implementation_extension: args.implementation_ext.clone(),
        dump_symbols: args.dump_symbols,
        ..CheckConfig::default()
    };
    let language_id = config.language_id.clone();

    let mut reporter = DiagnosticReporter::new();
    let mut service = LanguageService::new(config, keywords, DiagnosticStore::new());
    let mut clean = true;

    for input in &args.inputs {
        let document = SourceDocument::from_path(input)
            .with_context(|| format!("cannot check {}", input.display()))?
            .with_language(language_id.as_str());
        let file_id = reporter.add_file(document.id().as_str(), document.text());

        service.on_open(&document);
        let diagnostics = service.sink().get(document.id()).unwrap_or_default();
        reporter.report(file_id, diagnostics)?;

        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        eprintln!("{}: {} error(s), {} warning(s)", input.display(), errors, warnings);
        clean &= errors == 0;
    }

    Ok(clean)
}
