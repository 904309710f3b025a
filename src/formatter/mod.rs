// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! SQL formatting: configuration, rendering, diagnostics and the
//! file-oriented engine.

mod config;
mod diagnostics;
mod engine;
#[cfg(test)]
mod fixture_tests;
mod render;

pub use config::{CaseStyle, FormatterConfig, FormatterConfigError};
pub use diagnostics::{collect_token_diagnostics, FormatterDiagnostic};
pub use engine::{
    FormatMode, FormatterEngine, FormatterFileReport, FormatterOutput, FormatterRunReport,
    FormatterRunSummary,
};
pub use render::{render_tokens, IndentType};
