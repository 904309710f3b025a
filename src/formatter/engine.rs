// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{collect_token_diagnostics, render_tokens, FormatterConfig, FormatterDiagnostic};
use crate::keywords::Vocabulary;
use crate::splitter::split_token_stream;
use crate::tokenizer::{Token, Tokenizer};

/// Formatter execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Check,
    Write,
    Stdout,
}

/// Aggregate formatter run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatterRunSummary {
    pub files_seen: usize,
    pub files_changed: usize,
    pub warnings: usize,
    pub files_with_warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOutput {
    pub rendered: String,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterFileReport {
    pub path: PathBuf,
    pub changed: bool,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatterRunReport {
    pub summary: FormatterRunSummary,
    pub files: Vec<FormatterFileReport>,
}

/// SQL formatting engine: a keyword vocabulary plus rendering settings.
#[derive(Debug, Clone)]
pub struct FormatterEngine {
    vocabulary: Vocabulary,
    config: FormatterConfig,
}

impl FormatterEngine {
    pub fn new(config: FormatterConfig) -> Self {
        Self::with_vocabulary(Vocabulary::default(), config)
    }

    pub fn with_vocabulary(vocabulary: Vocabulary, config: FormatterConfig) -> Self {
        Self { vocabulary, config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tokenize_source(&self, source: &str) -> Vec<Token> {
        Tokenizer::new(&self.vocabulary).tokenize(source)
    }

    pub fn format_source_with_diagnostics(&self, source: &str) -> FormatterOutput {
        let tokens = self.tokenize_source(source);
        let diagnostics = collect_token_diagnostics(&tokens);
        let rendered = render_tokens(&tokens, &self.config);
        FormatterOutput {
            rendered,
            diagnostics,
        }
    }

    pub fn format_source(&self, source: &str) -> String {
        self.format_source_with_diagnostics(source).rendered
    }

    /// Splits multi-statement source into individual statement strings.
    pub fn split_source(&self, source: &str) -> Vec<String> {
        split_token_stream(&self.tokenize_source(source))
    }

    pub fn format_path_to_string(&self, path: &Path) -> io::Result<String> {
        let input = fs::read_to_string(path)?;
        Ok(self.format_source(&input))
    }

    pub fn run_paths(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunSummary> {
        let report = self.run_paths_with_report(paths, mode)?;
        Ok(report.summary)
    }

    pub fn run_paths_with_report(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunReport> {
        let mut report = FormatterRunReport {
            summary: FormatterRunSummary::default(),
            files: Vec::with_capacity(paths.len()),
        };
        for path in paths {
            report.summary.files_seen += 1;
            let input = fs::read_to_string(path)?;
            let output = self.format_source_with_diagnostics(&input);
            // Rewritten files always end with a single newline.
            let formatted = format!("{}\n", output.rendered);
            let changed = formatted != input;
            if changed {
                report.summary.files_changed += 1;
                if mode == FormatMode::Write {
                    fs::write(path, &formatted)?;
                }
            }
            if !output.diagnostics.is_empty() {
                report.summary.warnings += output.diagnostics.len();
                report.summary.files_with_warnings += 1;
            }
            report.files.push(FormatterFileReport {
                path: path.clone(),
                changed,
                diagnostics: output.diagnostics,
            });
        }
        Ok(report)
    }
}

impl Default for FormatterEngine {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}
