//! Trigger-driven language service

use std::fmt;

use tracing::{debug, info};

use super::{Document, analyze};
use crate::common::{DiagnosticSink, DocumentId};
use crate::config::CheckConfig;
use crate::keywords::{CompletionItem, KeywordTable};

/// Host event that starts a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Open,
    Save,
    Change,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Open => write!(f, "open"),
            Trigger::Save => write!(f, "save"),
            Trigger::Change => write!(f, "change"),
        }
    }
}

/// Validates documents on host events and publishes their diagnostics.
///
/// Every trigger runs one complete pass synchronously; its result replaces
/// whatever was published for the document before.
pub struct LanguageService<S: DiagnosticSink> {
    config: CheckConfig,
    keywords: KeywordTable,
    sink: S,
}

impl<S: DiagnosticSink> LanguageService<S> {
    pub fn new(config: CheckConfig, keywords: KeywordTable, sink: S) -> Self {
        Self {
            config,
            keywords,
            sink,
        }
    }

    pub fn on_open(&mut self, document: &dyn Document) -> bool {
        self.validate(document, Trigger::Open)
    }

    pub fn on_save(&mut self, document: &dyn Document) -> bool {
        self.validate(document, Trigger::Save)
    }

    pub fn on_change(&mut self, document: &dyn Document) -> bool {
        self.validate(document, Trigger::Change)
    }

    pub fn on_close(&mut self, document: &DocumentId) {
        self.sink.clear(document);
    }

    /// Run a pass and publish its diagnostics.
    ///
    /// Returns `false` without publishing when the document is not in the
    /// configured language.
    pub fn validate(&mut self, document: &dyn Document, trigger: Trigger) -> bool {
        if document.language_id() != self.config.language_id {
            debug!(document = %document.id(), language = document.language_id(), "skipping document");
            return false;
        }

        let analysis = analyze(document, &self.config);
        info!(
            document = %document.id(),
            %trigger,
            diagnostics = analysis.diagnostics.len(),
            "published diagnostics"
        );
        self.sink.publish(document.id(), analysis.diagnostics);
        true
    }

    pub fn completions(&self) -> Vec<CompletionItem> {
        self.keywords.completions()
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
