// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Single-pass rendering of a token stream into indented SQL text.
//!
//! The renderer walks the whitespace-stripped token sequence once,
//! carrying an indentation stack and a handful of one-shot flags that
//! defer indent changes and line breaks to the next placed token. All
//! state lives inside one `render_tokens` call.

use crate::formatter::config::FormatterConfig;
use crate::tokenizer::{Token, TokenKind};

/// Why an indentation level was opened. Closing `)` unwinds `Special`
/// levels until it finds the matching `Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentType {
    Block,
    Special,
}

/// A non-whitespace token plus whether whitespace preceded it in the
/// original stream. Spacing decisions (tight `(`/`::` etc.) depend on
/// the original layout, not the rendered one.
struct Placed<'a> {
    token: &'a Token,
    preceded_by_space: bool,
}

fn strip_whitespace(tokens: &[Token]) -> Vec<Placed<'_>> {
    let mut placed = Vec::with_capacity(tokens.len());
    let mut preceded = false;
    for token in tokens {
        if token.kind == TokenKind::Whitespace {
            preceded = true;
        } else {
            placed.push(Placed {
                token,
                preceded_by_space: preceded,
            });
            preceded = false;
        }
    }
    placed
}

/// Renders a tokenized statement as indented text. Total: every token
/// stream produces output, unbalanced input degrades instead of failing.
pub fn render_tokens(tokens: &[Token], config: &FormatterConfig) -> String {
    Renderer::new(config).render(&strip_whitespace(tokens))
}

struct Renderer<'a> {
    config: &'a FormatterConfig,
    out: String,
    indent_level: usize,
    indent_types: Vec<IndentType>,
    pending_special_indent: bool,
    pending_block_indent: bool,
    pending_newline: bool,
    just_added_newline: bool,
    inline_parentheses: bool,
    inline_indented: bool,
    inline_length: usize,
    limit_clause: bool,
}

impl<'a> Renderer<'a> {
    fn new(config: &'a FormatterConfig) -> Self {
        Self {
            config,
            out: String::new(),
            indent_level: 0,
            indent_types: Vec::new(),
            pending_special_indent: false,
            pending_block_indent: false,
            pending_newline: false,
            just_added_newline: false,
            inline_parentheses: false,
            inline_indented: false,
            inline_length: 0,
            limit_clause: false,
        }
    }

    fn render(mut self, placed: &[Placed<'_>]) -> String {
        for index in 0..placed.len() {
            self.place(placed, index);
        }
        self.out.trim().to_string()
    }

    fn place(&mut self, placed: &[Placed<'_>], index: usize) {
        let token = placed[index].token;

        if self.pending_special_indent {
            self.pending_special_indent = false;
            self.indent_level += 1;
            self.indent_types.push(IndentType::Special);
        }
        if self.pending_block_indent {
            self.pending_block_indent = false;
            self.indent_level += 1;
            self.indent_types.push(IndentType::Block);
        }
        if self.pending_newline {
            self.pending_newline = false;
            self.newline();
            self.just_added_newline = true;
        } else {
            self.just_added_newline = false;
        }

        let mut display = if token.kind.is_reserved() {
            self.config.keyword_case.apply(&token.text)
        } else {
            token.text.clone()
        };

        // Comments stay where they are and push the rest to a new line.
        if token.kind.is_comment() {
            if token.kind == TokenKind::BlockComment {
                let indent = self.config.indent.repeat(self.indent_level);
                trim_end_chars(&mut self.out, &[' ', '\t']);
                self.out.push('\n');
                self.out.push_str(&indent);
                display = reindent_block_comment(&display, &indent);
            }
            self.out.push_str(&display);
            self.pending_newline = true;
            return;
        }

        if self.inline_parentheses {
            if token.text == ")" {
                trim_end_spaces(&mut self.out);
                if self.inline_indented {
                    self.indent_types.pop();
                    self.indent_level = self.indent_level.saturating_sub(1);
                    self.newline();
                }
                self.inline_parentheses = false;
                self.out.push_str(&display);
                self.out.push(' ');
                return;
            }
            if token.text == "," && self.inline_length >= self.config.inline_reflow_limit {
                self.inline_length = 0;
                self.pending_newline = true;
            }
            self.inline_length += token.text.len();
        }

        if token.text == "(" {
            // Keep the group on one line when its closer is near and
            // nothing clause-like sits in between.
            let mut group_length = 0;
            for step in 1..=self.config.inline_lookahead {
                let Some(next) = placed.get(index + step) else {
                    break;
                };
                let next = next.token;
                if next.text == ")" {
                    self.inline_parentheses = true;
                    self.inline_length = 0;
                    self.inline_indented = false;
                    break;
                }
                if next.text == ";" || next.text == "(" {
                    break;
                }
                if next.kind == TokenKind::ReservedTopLevel
                    || next.kind == TokenKind::ReservedNewline
                    || next.kind.is_comment()
                {
                    break;
                }
                group_length += next.text.len();
            }
            if self.inline_parentheses && group_length > self.config.inline_reflow_limit {
                self.pending_block_indent = true;
                self.inline_indented = true;
                self.pending_newline = true;
            }
            if !placed[index].preceded_by_space {
                trim_end_spaces(&mut self.out);
            }
            if !self.inline_parentheses {
                self.pending_block_indent = true;
                self.pending_newline = true;
            }
        } else if token.text == ")" {
            if !self.indent_types.contains(&IndentType::Block) {
                // Unmatched closer: drop the token, leaving the output
                // and the open scopes as if it never appeared. A line
                // opened just for this token is rolled back so that
                // re-formatting is a fixpoint.
                if self.just_added_newline {
                    self.trim_trailing_indent();
                    if self.out.ends_with('\n') {
                        self.out.pop();
                    }
                    self.pending_newline = true;
                }
                return;
            }
            trim_end_spaces(&mut self.out);
            let mut levels = 1;
            while let Some(tag) = self.indent_types.pop() {
                match tag {
                    IndentType::Special => levels += 1,
                    IndentType::Block => break,
                }
            }
            self.indent_level = self.indent_level.saturating_sub(levels);
            if !self.just_added_newline {
                self.newline();
            }
        } else if token.kind == TokenKind::ReservedTopLevel {
            self.pending_special_indent = true;
            if self.indent_types.last() == Some(&IndentType::Special) {
                self.indent_types.pop();
                self.indent_level = self.indent_level.saturating_sub(1);
            }
            self.pending_newline = true;
            if self.just_added_newline {
                // The sibling pop above may have changed the level of the
                // line just opened; redo its indentation in place.
                self.trim_trailing_indent();
                let indent = self.config.indent.repeat(self.indent_level);
                self.out.push_str(&indent);
            } else {
                self.newline();
            }
            display = collapse_whitespace(&display);
            if token.text.eq_ignore_ascii_case("LIMIT") && !self.inline_parentheses {
                self.limit_clause = true;
            }
        } else if self.limit_clause && token.text != "," && token.kind != TokenKind::Number {
            self.limit_clause = false;
        } else if token.text == "," && !self.inline_parentheses {
            if self.limit_clause {
                // LIMIT m, n stays on one line.
                self.pending_newline = false;
                self.limit_clause = false;
            } else {
                self.pending_newline = true;
            }
        } else if token.kind == TokenKind::ReservedNewline {
            if !self.just_added_newline {
                self.newline();
            }
            display = collapse_whitespace(&display);
        } else if token.kind == TokenKind::Boundary {
            let after_boundary =
                index > 0 && placed[index - 1].token.kind == TokenKind::Boundary;
            if after_boundary && !placed[index].preceded_by_space {
                trim_end_spaces(&mut self.out);
            }
        }

        if matches!(token.text.as_str(), "." | "," | ";") {
            trim_end_spaces(&mut self.out);
        }
        self.out.push_str(&display);
        self.out.push(' ');
        if matches!(token.text.as_str(), "(" | ".") {
            trim_end_spaces(&mut self.out);
        }

        // Unary minus binds to the number that follows.
        if token.text == "-" && index > 0 {
            let next_is_number = placed
                .get(index + 1)
                .is_some_and(|next| next.token.kind == TokenKind::Number);
            let prev = placed[index - 1].token.kind;
            let prev_ends_value = matches!(
                prev,
                TokenKind::Quoted | TokenKind::BacktickQuoted | TokenKind::Word | TokenKind::Number
            );
            if next_is_number && !prev_ends_value {
                trim_end_spaces(&mut self.out);
            }
        }
    }

    fn newline(&mut self) {
        trim_end_spaces(&mut self.out);
        self.out.push('\n');
        let indent = self.config.indent.repeat(self.indent_level);
        self.out.push_str(&indent);
    }

    fn trim_trailing_indent(&mut self) {
        while self
            .out
            .chars()
            .next_back()
            .is_some_and(|c| c != '\n' && self.config.indent.contains(c))
        {
            self.out.pop();
        }
    }
}

fn trim_end_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn trim_end_chars(out: &mut String, chars: &[char]) {
    while out.chars().next_back().is_some_and(|c| chars.contains(&c)) {
        out.pop();
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Continuation lines drop whatever leading whitespace they carried and
/// take the current indentation, so repeated formatting is a fixpoint.
fn reindent_block_comment(comment: &str, indent: &str) -> String {
    let mut lines = comment.split('\n');
    let mut out = String::with_capacity(comment.len());
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        out.push_str(indent);
        out.push_str(line.trim_start());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_tokens;
    use crate::formatter::config::{CaseStyle, FormatterConfig};
    use crate::keywords::Vocabulary;
    use crate::tokenizer::Tokenizer;
    use proptest::prelude::*;

    fn fmt(sql: &str) -> String {
        fmt_with(sql, &FormatterConfig::default())
    }

    fn fmt_with(sql: &str, config: &FormatterConfig) -> String {
        let vocabulary = Vocabulary::default();
        let tokens = Tokenizer::new(&vocabulary).tokenize(sql);
        render_tokens(&tokens, config)
    }

    #[test]
    fn clause_keywords_indent_their_clause_bodies() {
        assert_eq!(
            fmt("SELECT id, name FROM users WHERE age >= 21;"),
            "SELECT\n\tid,\n\tname\nFROM\n\tusers\nWHERE\n\tage >= 21;"
        );
    }

    #[test]
    fn function_call_parentheses_stay_tight() {
        assert_eq!(
            fmt("SELECT COUNT(order_id) FROM orders"),
            "SELECT\n\tCOUNT(order_id)\nFROM\n\torders"
        );
    }

    #[test]
    fn short_parenthesized_group_stays_inline() {
        assert_eq!(
            fmt("INSERT INTO t (a, b) VALUES (1, 2);"),
            "INSERT INTO t (a, b)\nVALUES\n\t(1, 2);"
        );
    }

    #[test]
    fn long_inline_group_is_indented_and_reflows_at_commas() {
        assert_eq!(
            fmt("INSERT INTO t VALUES (1111111111, 2222222222, 3333333333, 4444444444);"),
            "INSERT INTO t\nVALUES\n\t(\n\t\t1111111111, 2222222222, 3333333333,\n\t\t4444444444\n\t);"
        );
    }

    #[test]
    fn subquery_gets_block_indent() {
        assert_eq!(
            fmt("SELECT * FROM (SELECT id FROM t WHERE x = 1) a"),
            "SELECT\n\t*\nFROM\n\t(\n\t\tSELECT\n\t\t\tid\n\t\tFROM\n\t\t\tt\n\t\tWHERE\n\t\t\tx = 1\n\t) a"
        );
    }

    #[test]
    fn join_keywords_break_without_indenting() {
        assert_eq!(
            fmt("SELECT a FROM t INNER JOIN u ON t.id = u.id"),
            "SELECT\n\ta\nFROM\n\tt\n\tINNER JOIN u ON t.id = u.id"
        );
    }

    #[test]
    fn limit_comma_stays_on_one_line() {
        assert_eq!(fmt("SELECT a FROM t LIMIT 10, 20"), "SELECT\n\ta\nFROM\n\tt\nLIMIT\n\t10, 20");
    }

    #[test]
    fn unbalanced_closing_parenthesis_is_dropped() {
        assert_eq!(fmt("SELECT 1)"), "SELECT\n\t1");
    }

    #[test]
    fn dropped_parenthesis_at_clause_start_leaves_no_dangling_line() {
        let once = fmt("ORDER BY ) SELECT");
        assert_eq!(once, "ORDER BY\nSELECT");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn dropped_parenthesis_keeps_the_open_clause_indentation() {
        let once = fmt("SELECT ) 1");
        assert_eq!(once, "SELECT\n\t1");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn adjacent_boundaries_without_original_space_stay_tight() {
        assert_eq!(fmt("SELECT a::text FROM t"), "SELECT\n\ta :: text\nFROM\n\tt");
        assert_eq!(fmt("SELECT a : : b FROM t"), "SELECT\n\ta : : b\nFROM\n\tt");
    }

    #[test]
    fn minus_fuses_with_following_number_after_operator() {
        assert_eq!(fmt("SELECT -1"), "SELECT\n\t-1");
        assert_eq!(fmt("SELECT a WHERE b = -1"), "SELECT\n\ta\nWHERE\n\tb = -1");
    }

    #[test]
    fn minus_stays_binary_after_value_like_token() {
        assert_eq!(fmt("SELECT 5 - 3"), "SELECT\n\t5 - 3");
        assert_eq!(fmt("SELECT a - 3"), "SELECT\n\ta - 3");
    }

    #[test]
    fn qualified_identifiers_stay_tight() {
        assert_eq!(fmt("SELECT db.select FROM t"), "SELECT\n\tdb.select\nFROM\n\tt");
    }

    #[test]
    fn keyword_case_upper_rewrites_reserved_words_only() {
        let config = FormatterConfig {
            keyword_case: CaseStyle::Upper,
            ..FormatterConfig::default()
        };
        assert_eq!(
            fmt_with("select id from Users where x and y", &config),
            "SELECT\n\tid\nFROM\n\tUsers\nWHERE\n\tx\n\tAND y"
        );
    }

    #[test]
    fn multi_word_keyword_spacing_collapses_in_display() {
        assert_eq!(fmt("SELECT a GROUP   BY b"), "SELECT\n\ta\nGROUP BY\n\tb");
    }

    #[test]
    fn line_comment_stays_at_end_of_its_line() {
        assert_eq!(
            fmt("SELECT 1 -- note\nFROM t"),
            "SELECT\n\t1 -- note\nFROM\n\tt"
        );
    }

    #[test]
    fn block_comment_moves_to_its_own_indented_line() {
        assert_eq!(
            fmt("SELECT 1 /* note */ FROM t"),
            "SELECT\n\t1\n\t/* note */\nFROM\n\tt"
        );
    }

    #[test]
    fn multi_line_block_comment_reindents_to_a_fixpoint() {
        let once = fmt("SELECT 1 /* a\n   b */ FROM t");
        assert_eq!(once, "SELECT\n\t1\n\t/* a\n\tb */\nFROM\n\tt");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn custom_indent_unit_is_used_for_every_level() {
        let config = FormatterConfig {
            indent: "  ".to_string(),
            ..FormatterConfig::default()
        };
        assert_eq!(
            fmt_with("SELECT a FROM (SELECT b FROM t) x", &config),
            "SELECT\n  a\nFROM\n  (\n    SELECT\n      b\n    FROM\n      t\n  ) x"
        );
    }

    #[test]
    fn empty_and_whitespace_input_render_empty() {
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("   \n\t "), "");
    }

    #[test]
    fn formatting_is_idempotent_on_fixed_statements() {
        let samples = [
            "SELECT id, name FROM users WHERE age >= 21;",
            "INSERT INTO t (a, b) VALUES (1, 2);",
            "SELECT * FROM (SELECT id FROM t WHERE x = 1) a",
            "SELECT a FROM t LIMIT 10, 20",
            "UPDATE t SET a = 1, b = 2 WHERE id = 3",
        ];
        for sample in samples {
            let once = fmt(sample);
            assert_eq!(fmt(&once), once, "not idempotent for {sample:?}");
        }
    }

    fn sql_fragment() -> impl Strategy<Value = String> {
        let word = prop_oneof![
            Just("SELECT"),
            Just("FROM"),
            Just("WHERE"),
            Just("AND"),
            Just("ORDER BY"),
            Just("LIMIT"),
            Just("foo"),
            Just("bar_baz"),
            Just("t1"),
            Just("12"),
            Just("3.5"),
            Just("'x y'"),
            Just(","),
            Just("("),
            Just(")"),
            Just("."),
            Just("="),
            Just(";"),
            Just("/* note */"),
            Just("/* a\n   b */"),
        ];
        proptest::collection::vec(word, 0..24).prop_map(|words| words.join(" "))
    }

    proptest! {
        #[test]
        fn rendering_never_panics(input in ".*") {
            let vocabulary = Vocabulary::default();
            let tokens = Tokenizer::new(&vocabulary).tokenize(&input);
            let _ = render_tokens(&tokens, &FormatterConfig::default());
        }

        #[test]
        fn rendering_is_idempotent(input in sql_fragment()) {
            let once = fmt(&input);
            prop_assert_eq!(fmt(&once), once.clone());
        }
    }
}
