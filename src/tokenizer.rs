// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Lossless SQL tokenizer.
//!
//! Every byte of the input ends up in exactly one token, whitespace
//! included, so concatenating the raw text of the token stream reproduces
//! the input. Tokenization is total: unterminated literals run to end of
//! input, and a scan position that cannot advance yields one final
//! `Error` token covering the remainder.

use crate::keywords::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Word,
    Quoted,
    BacktickQuoted,
    Reserved,
    ReservedTopLevel,
    ReservedNewline,
    Boundary,
    LineComment,
    BlockComment,
    Number,
    Variable,
    Error,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::Reserved | Self::ReservedTopLevel | Self::ReservedNewline
        )
    }
}

/// A classified fragment of the input, paired with its exact original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Rule-ordered scanner over one vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Tokenizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut rest = text;
        // A word directly after '.' is a qualified-identifier component and
        // must never be classified as a keyword.
        let mut after_dot = false;

        while !rest.is_empty() {
            let token = self.next_token(rest, after_dot);
            if token.text.is_empty() {
                // No rule advanced the scan position. Wrap the remainder and
                // stop, guaranteeing termination.
                tokens.push(Token::new(TokenKind::Error, rest));
                break;
            }
            rest = &rest[token.text.len()..];
            if token.kind != TokenKind::Whitespace {
                after_dot = token.text == ".";
            }
            tokens.push(token);
        }

        tokens
    }

    fn next_token(&self, rest: &str, after_dot: bool) -> Token {
        if let Some(len) = whitespace_len(rest) {
            return Token::new(TokenKind::Whitespace, &rest[..len]);
        }
        if let Some(token) = scan_comment(rest) {
            return token;
        }
        if let Some(token) = scan_quoted(rest) {
            return token;
        }
        if let Some(token) = scan_variable(rest) {
            return token;
        }
        if let Some(len) = self.number_len(rest) {
            return Token::new(TokenKind::Number, &rest[..len]);
        }
        if let Some(len) = self.vocabulary.match_boundary(rest) {
            return Token::new(TokenKind::Boundary, &rest[..len]);
        }
        if !after_dot {
            if let Some(len) = self.phrase_len(rest, self.vocabulary.reserved_top_level()) {
                return Token::new(TokenKind::ReservedTopLevel, &rest[..len]);
            }
            if let Some(len) = self.phrase_len(rest, self.vocabulary.reserved_newline()) {
                return Token::new(TokenKind::ReservedNewline, &rest[..len]);
            }
            if let Some(len) = self.phrase_len(rest, self.vocabulary.reserved()) {
                return Token::new(TokenKind::Reserved, &rest[..len]);
            }
        }
        if let Some(len) = self.function_len(rest) {
            return Token::new(TokenKind::Reserved, &rest[..len]);
        }
        Token::new(TokenKind::Word, &rest[..self.word_len(rest)])
    }

    /// Decimal (optional fraction), hex `0x...`, or binary `0b...`, valid only
    /// when followed by a boundary symbol, whitespace, a quote character, or
    /// end of input. Anything else falls through to `Word`.
    fn number_len(&self, rest: &str) -> Option<usize> {
        let bytes = rest.as_bytes();
        let len = if bytes.len() > 2 && bytes[0] == b'0' && bytes[1] == b'x' {
            let digits = run_len(&bytes[2..], |b| b.is_ascii_hexdigit());
            if digits == 0 {
                return None;
            }
            2 + digits
        } else if bytes.len() > 2 && bytes[0] == b'0' && bytes[1] == b'b' {
            let digits = run_len(&bytes[2..], |b| b == b'0' || b == b'1');
            if digits == 0 {
                return None;
            }
            2 + digits
        } else {
            let digits = run_len(bytes, |b| b.is_ascii_digit());
            if digits == 0 {
                return None;
            }
            let mut len = digits;
            if bytes.get(len) == Some(&b'.') {
                let fraction = run_len(&bytes[len + 1..], |b| b.is_ascii_digit());
                if fraction > 0 {
                    len += 1 + fraction;
                }
            }
            len
        };

        let after = &rest[len..];
        let terminated = after.is_empty()
            || after
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`'))
            || self.vocabulary.is_boundary_start(after);
        terminated.then_some(len)
    }

    /// First phrase in the list matching case-insensitively at the scan
    /// position and followed by whitespace, a boundary symbol, or end of
    /// input. Whitespace between phrase words may be any run; the returned
    /// length covers the original spelling.
    fn phrase_len(&self, rest: &str, phrases: &[String]) -> Option<usize> {
        for phrase in phrases {
            if let Some(len) = match_phrase(rest, phrase) {
                let after = &rest[len..];
                let terminated = after.is_empty()
                    || after.chars().next().is_some_and(char::is_whitespace)
                    || self.vocabulary.is_boundary_start(after);
                if terminated {
                    return Some(len);
                }
            }
        }
        None
    }

    /// A configured function name counts as reserved only when a parenthesis
    /// follows (directly, or after whitespace for an opening one). The
    /// parenthesis stays outside the token.
    fn function_len(&self, rest: &str) -> Option<usize> {
        for name in self.vocabulary.functions() {
            let len = name.len();
            if rest.len() < len || !rest.as_bytes()[..len].eq_ignore_ascii_case(name.as_bytes()) {
                continue;
            }
            let after = &rest[len..];
            match after.chars().next() {
                Some('(') | Some(')') => return Some(len),
                Some(c) if c.is_whitespace() => {
                    if after.trim_start().starts_with('(') {
                        return Some(len);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Fallback: the longest run up to whitespace, a quote character, or a
    /// boundary symbol.
    fn word_len(&self, rest: &str) -> usize {
        for (idx, c) in rest.char_indices() {
            if c.is_whitespace()
                || matches!(c, '"' | '\'' | '`')
                || self.vocabulary.is_boundary_start(&rest[idx..])
            {
                return idx;
            }
        }
        rest.len()
    }
}

fn whitespace_len(rest: &str) -> Option<usize> {
    match rest.find(|c: char| !c.is_whitespace()) {
        Some(0) => None,
        Some(len) => Some(len),
        None => Some(rest.len()),
    }
}

fn scan_comment(rest: &str) -> Option<Token> {
    if rest.starts_with('#') || rest.starts_with("--") {
        // The trailing newline stays outside the token so reconstruction
        // keeps the original line structure.
        let len = rest.find('\n').unwrap_or(rest.len());
        return Some(Token::new(TokenKind::LineComment, &rest[..len]));
    }
    if rest.starts_with("/*") {
        let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
        return Some(Token::new(TokenKind::BlockComment, &rest[..len]));
    }
    None
}

fn scan_quoted(rest: &str) -> Option<Token> {
    let first = rest.chars().next()?;
    match first {
        '`' => Some(Token::new(
            TokenKind::BacktickQuoted,
            &rest[..backtick_len(rest)],
        )),
        '[' => Some(Token::new(
            TokenKind::BacktickQuoted,
            &rest[..bracket_len(rest)],
        )),
        '"' | '\'' => Some(Token::new(
            TokenKind::Quoted,
            &rest[..quoted_len(rest, first)],
        )),
        _ => None,
    }
}

fn scan_variable(rest: &str) -> Option<Token> {
    if !rest.starts_with('@') || rest.len() < 2 {
        return None;
    }
    let after = &rest[1..];
    let first = after.chars().next()?;
    if matches!(first, '"' | '\'' | '`') {
        let len = if first == '`' {
            backtick_len(after)
        } else {
            quoted_len(after, first)
        };
        return Some(Token::new(TokenKind::Variable, &rest[..len + 1]));
    }
    let len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$')))
        .unwrap_or(after.len());
    if len == 0 {
        return None;
    }
    Some(Token::new(TokenKind::Variable, &rest[..len + 1]))
}

/// Length of a single- or double-quoted literal starting at `s`. Honors
/// backslash escapes and doubled-quote continuation; an unterminated
/// literal runs to end of input.
fn quoted_len(s: &str, quote: char) -> usize {
    let mut iter = s.char_indices().peekable();
    iter.next(); // opening quote
    let mut escaped = false;
    while let Some((idx, c)) = iter.next() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == quote {
            if matches!(iter.peek(), Some((_, next)) if *next == quote) {
                iter.next();
                continue;
            }
            return idx + c.len_utf8();
        }
    }
    s.len()
}

/// Backtick identifier, with doubled backticks continuing the name.
fn backtick_len(s: &str) -> usize {
    let mut end = 0;
    let mut rest = s;
    while rest.starts_with('`') {
        match rest[1..].find('`') {
            Some(i) => {
                end += i + 2;
                rest = &rest[i + 2..];
            }
            None => return s.len(),
        }
    }
    end
}

/// Bracket identifier, with `]]` continuing the name.
fn bracket_len(s: &str) -> usize {
    let Some(i) = s[1..].find(']') else {
        return s.len();
    };
    let mut end = i + 2;
    while s[end..].starts_with(']') {
        match s[end + 1..].find(']') {
            Some(i) => end += i + 2,
            None => return s.len(),
        }
    }
    end
}

fn run_len(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|b| pred(**b)).count()
}

/// Case-insensitive match of `phrase` at the start of `rest`, where each
/// single space in the phrase matches any whitespace run in the input.
/// Returns the matched byte length in `rest`.
fn match_phrase(rest: &str, phrase: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut pos = 0;
    let mut words = phrase.split(' ').peekable();
    while let Some(word) = words.next() {
        let end = pos + word.len();
        if bytes.len() < end || !bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
            return None;
        }
        pos = end;
        if words.peek().is_some() {
            let gap = rest[pos..]
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len() - pos);
            if gap == 0 {
                return None;
            }
            pos += gap;
        }
    }
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenKind, Tokenizer};
    use crate::keywords::Vocabulary;
    use proptest::prelude::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let vocabulary = Vocabulary::default();
        Tokenizer::new(&vocabulary).tokenize(input)
    }

    fn kinds_and_text(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn classifies_top_level_newline_and_plain_reserved_words() {
        let tokens = kinds_and_text("SELECT a FROM t WHERE x AND y AS z");
        assert_eq!(tokens[0], (TokenKind::ReservedTopLevel, "SELECT".into()));
        assert_eq!(tokens[2], (TokenKind::ReservedTopLevel, "FROM".into()));
        assert_eq!(tokens[4], (TokenKind::ReservedTopLevel, "WHERE".into()));
        assert_eq!(tokens[6], (TokenKind::ReservedNewline, "AND".into()));
        assert_eq!(tokens[8], (TokenKind::Reserved, "AS".into()));
    }

    #[test]
    fn multi_word_phrase_keeps_original_case_and_spacing() {
        let tokens = kinds_and_text("group   by x");
        assert_eq!(
            tokens[0],
            (TokenKind::ReservedTopLevel, "group   by".into())
        );
    }

    #[test]
    fn word_after_dot_is_never_a_keyword() {
        let tokens = kinds_and_text("a.select");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "a".into()),
                (TokenKind::Boundary, ".".into()),
                (TokenKind::Word, "select".into()),
            ]
        );
    }

    #[test]
    fn dot_exception_skips_intervening_whitespace() {
        let tokens = kinds_and_text("a. select");
        assert_eq!(tokens[2], (TokenKind::Word, "select".into()));
    }

    #[test]
    fn keyword_prefix_of_longer_word_stays_a_word() {
        let tokens = kinds_and_text("SELECTED");
        assert_eq!(tokens, vec![(TokenKind::Word, "SELECTED".into())]);
    }

    #[test]
    fn function_name_requires_following_parenthesis() {
        let with_paren = kinds_and_text("COUNT(x)");
        assert_eq!(with_paren[0], (TokenKind::Reserved, "COUNT".into()));
        assert_eq!(with_paren[1], (TokenKind::Boundary, "(".into()));

        let without = kinds_and_text("COUNT x");
        assert_eq!(without[0], (TokenKind::Word, "COUNT".into()));
    }

    #[test]
    fn numbers_require_a_terminating_boundary_or_whitespace() {
        assert_eq!(
            kinds_and_text("3.14,"),
            vec![
                (TokenKind::Number, "3.14".into()),
                (TokenKind::Boundary, ",".into()),
            ]
        );
        assert_eq!(kinds_and_text("0x1f")[0], (TokenKind::Number, "0x1f".into()));
        assert_eq!(kinds_and_text("0b10")[0], (TokenKind::Number, "0b10".into()));
        // An identifier character right after the digits absorbs them into a word.
        assert_eq!(kinds_and_text("1abc")[0], (TokenKind::Word, "1abc".into()));
        assert_eq!(kinds_and_text("0X1F")[0], (TokenKind::Word, "0X1F".into()));
    }

    #[test]
    fn quoted_literals_honor_escapes_and_doubling() {
        assert_eq!(
            kinds_and_text(r#"'it''s \'ok\''"#)[0],
            (TokenKind::Quoted, r#"'it''s \'ok\''"#.into())
        );
        assert_eq!(
            kinds_and_text("`a``b` [c]]d]"),
            vec![
                (TokenKind::BacktickQuoted, "`a``b`".into()),
                (TokenKind::BacktickQuoted, "[c]]d]".into()),
            ]
        );
    }

    #[test]
    fn unterminated_literal_runs_to_end_of_input() {
        assert_eq!(
            kinds_and_text("'never closed"),
            vec![(TokenKind::Quoted, "'never closed".into())]
        );
        assert_eq!(
            kinds_and_text("/* still open"),
            vec![(TokenKind::BlockComment, "/* still open".into())]
        );
    }

    #[test]
    fn variables_take_sigil_plus_identifier_or_quoted_name() {
        assert_eq!(
            kinds_and_text("@user_id @'quoted name' @"),
            vec![
                (TokenKind::Variable, "@user_id".into()),
                (TokenKind::Variable, "@'quoted name'".into()),
                (TokenKind::Word, "@".into()),
            ]
        );
    }

    #[test]
    fn line_comment_excludes_its_newline() {
        let tokens = tokenize("-- note\nSELECT 1");
        assert_eq!(tokens[0], Token::new(TokenKind::LineComment, "-- note"));
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].text, "\n");
    }

    #[test]
    fn hash_comment_is_recognized() {
        let tokens = kinds_and_text("# note");
        assert_eq!(tokens, vec![(TokenKind::LineComment, "# note".into())]);
    }

    #[test]
    fn concatenated_token_text_reproduces_the_input() {
        let inputs = [
            "SELECT a, b FROM t WHERE x = 'v' -- done",
            "select  *\nfrom `t``x`  /* multi\nline */ where a.b=1;",
            "@v := COUNT( * ) + 0x2a",
            "broken 'unterminated",
        ];
        for input in inputs {
            let joined: String = tokenize(input).iter().map(|t| t.text.as_str()).collect();
            assert_eq!(joined, input);
        }
    }

    proptest! {
        #[test]
        fn tokenization_is_lossless_for_arbitrary_input(input in ".*") {
            let joined: String = tokenize(&input).iter().map(|t| t.text.as_str()).collect();
            prop_assert_eq!(joined, input);
        }

        #[test]
        fn token_count_never_exceeds_input_length(input in ".*") {
            let tokens = tokenize(&input);
            prop_assert!(tokens.len() <= input.chars().count().max(1));
        }
    }
}
