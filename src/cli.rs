// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::env;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::formatter::FormatMode;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "SQL pretty-printer built on a lossless tokenizer.

Formats the given files (or --sql text, or standard input when neither is
given) into a canonically indented multi-line layout. By default the result
is printed to stdout; --write rewrites files in place and --check reports
which files would change without touching them (exit status 1 when any
would). --split treats the input as a multi-statement script and formats
each statement separately when printing to stdout.";

#[derive(Parser, Debug)]
#[command(
    name = "sqlforge",
    version = VERSION,
    about = "SQL formatter: clause-aware indentation, statement splitting, dialect by keyword list",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select CLI output format. text is default; json emits a machine-readable run report."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'c',
        long = "check",
        action = ArgAction::SetTrue,
        conflicts_with = "write",
        long_help = "Report files whose formatting would change, without rewriting them. Exit status is 1 when any file would change."
    )]
    pub check: bool,
    #[arg(
        short = 'w',
        long = "write",
        action = ArgAction::SetTrue,
        long_help = "Rewrite the given files in place instead of printing to stdout."
    )]
    pub write: bool,
    #[arg(
        short = 's',
        long = "split",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["check", "write"],
        long_help = "Split multi-statement input on top-level ';' and format each statement separately. Only applies when printing to stdout; cannot be combined with --check or --write."
    )]
    pub split: bool,
    #[arg(
        long = "config",
        value_name = "FILE",
        long_help = "Load formatter settings from a TOML FILE. Falls back to the SQLFORGE_CONFIG environment variable when omitted."
    )]
    pub config_file: Option<PathBuf>,
    #[arg(
        long = "sql",
        value_name = "SQL",
        conflicts_with_all = ["check", "write"],
        long_help = "Format the given SQL text instead of reading files or standard input."
    )]
    pub sql: Option<String>,
    #[arg(
        value_name = "FILES",
        long_help = "SQL files to format. When none are given and --sql is absent, input is read from standard input."
    )]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where the input text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Inline(String),
    Stdin,
    Files(Vec<PathBuf>),
}

/// Validated run plan derived from the raw CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliRun {
    pub mode: FormatMode,
    pub format: OutputFormat,
    pub split: bool,
    pub config_file: Option<PathBuf>,
    pub source: InputSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn validate_cli(cli: &Cli) -> Result<CliRun, CliError> {
    let source = match (&cli.sql, cli.inputs.is_empty()) {
        (Some(_), false) => {
            return Err(CliError::new("--sql cannot be combined with input files"));
        }
        (Some(sql), true) => InputSource::Inline(sql.clone()),
        (None, true) => InputSource::Stdin,
        (None, false) => InputSource::Files(cli.inputs.clone()),
    };

    let mode = if cli.check {
        FormatMode::Check
    } else if cli.write {
        FormatMode::Write
    } else {
        FormatMode::Stdout
    };

    if mode != FormatMode::Stdout && !matches!(source, InputSource::Files(_)) {
        return Err(CliError::new(
            "--check and --write require at least one input file",
        ));
    }

    let config_file = match &cli.config_file {
        Some(path) => Some(path.clone()),
        None => env::var_os("SQLFORGE_CONFIG").map(PathBuf::from),
    };

    Ok(CliRun {
        mode,
        format: cli.format,
        split: cli.split,
        config_file,
        source,
    })
}
