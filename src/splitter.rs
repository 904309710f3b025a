// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Splits multi-statement SQL text on top-level `;` terminators.

use crate::tokenizer::{Token, TokenKind};

/// Splits an already-tokenized stream into individual statement strings.
///
/// A `;` flushes the accumulated raw text (plus the terminator) as one
/// statement when anything other than whitespace or comments was seen
/// since the last flush; empty segments between terminators are dropped.
/// A trailing unterminated statement is emitted trimmed.
pub fn split_token_stream(tokens: &[Token]) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut significant = false;

    for token in tokens {
        if token.kind == TokenKind::Boundary && token.text == ";" {
            if significant {
                current.push(';');
                statements.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            significant = false;
        } else {
            if token.kind != TokenKind::Whitespace && !token.kind.is_comment() {
                significant = true;
            }
            current.push_str(&token.text);
        }
    }

    if significant {
        statements.push(current.trim().to_string());
    }
    statements
}
