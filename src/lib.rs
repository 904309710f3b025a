// Library entry exposing the SQL formatting modules.
pub mod cli;
pub mod formatter;
pub mod keywords;
pub mod splitter;
pub mod tokenizer;

use std::sync::OnceLock;

use formatter::FormatterEngine;
use tokenizer::Token;

fn default_engine() -> &'static FormatterEngine {
    static ENGINE: OnceLock<FormatterEngine> = OnceLock::new();
    ENGINE.get_or_init(FormatterEngine::default)
}

/// Formats SQL text with the default vocabulary and settings.
pub fn format(sql: &str) -> String {
    default_engine().format_source(sql)
}

/// Tokenizes SQL text with the default vocabulary.
pub fn tokenize(sql: &str) -> Vec<Token> {
    default_engine().tokenize_source(sql)
}

/// Splits multi-statement SQL text on top-level `;` terminators.
pub fn split_statements(sql: &str) -> Vec<String> {
    default_engine().split_source(sql)
}
