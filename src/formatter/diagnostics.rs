// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Non-fatal findings about a token stream. Formatting always produces
//! output; diagnostics tell the caller what degraded along the way.

use crate::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterDiagnostic {
    pub line_number: usize,
    pub message: String,
}

impl FormatterDiagnostic {
    fn new(line_number: usize, message: impl Into<String>) -> Self {
        Self {
            line_number,
            message: message.into(),
        }
    }
}

/// Scans a token stream for error tokens and unbalanced parentheses.
/// Line numbers are 1-based and refer to the original input.
pub fn collect_token_diagnostics(tokens: &[Token]) -> Vec<FormatterDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut open_parens: Vec<usize> = Vec::new();
    let mut line = 1;

    for token in tokens {
        match token.kind {
            TokenKind::Error => {
                diagnostics.push(FormatterDiagnostic::new(
                    line,
                    format!("unrecognized input: {}", summarize(&token.text)),
                ));
            }
            TokenKind::Boundary if token.text == "(" => {
                open_parens.push(line);
            }
            TokenKind::Boundary if token.text == ")" => {
                if open_parens.pop().is_none() {
                    diagnostics.push(FormatterDiagnostic::new(line, "unmatched ')'"));
                }
            }
            _ => {}
        }
        line += token.text.matches('\n').count();
    }

    for opened_at in open_parens {
        diagnostics.push(FormatterDiagnostic::new(opened_at, "unclosed '('"));
    }

    diagnostics
}

fn summarize(text: &str) -> String {
    const MAX: usize = 32;
    let mut end = text.len().min(MAX);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    if end < text.len() {
        format!("'{}...'", &text[..end])
    } else {
        format!("'{text}'")
    }
}
