//! Checker configuration

/// Configuration shared by every validation pass
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Language id of documents the language service validates
    pub language_id: String,
    /// Extension of module metadata files (`EXTERN` declarations)
    pub metadata_extension: String,
    /// Extension of module implementation files (label definitions)
    pub implementation_extension: String,
    /// Print the symbol table and modules after each pass
    pub dump_symbols: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            language_id: "stackscript".to_string(),
            metadata_extension: "stackm".to_string(),
            implementation_extension: "stack".to_string(),
            dump_symbols: false,
        }
    }
}
