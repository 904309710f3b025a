// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStyle {
    #[default]
    Keep,
    Upper,
    Lower,
}

impl CaseStyle {
    pub fn apply(self, value: &str) -> String {
        match self {
            CaseStyle::Keep => value.to_string(),
            CaseStyle::Upper => value.to_ascii_uppercase(),
            CaseStyle::Lower => value.to_ascii_lowercase(),
        }
    }
}

/// Formatter settings used by the rendering engine.
///
/// The lookahead window and reflow budget are tunable heuristics for
/// deciding when a parenthesized group stays on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    pub indent: String,
    pub keyword_case: CaseStyle,
    pub inline_lookahead: usize,
    pub inline_reflow_limit: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            keyword_case: CaseStyle::Keep,
            inline_lookahead: 250,
            inline_reflow_limit: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfigError {
    message: String,
}

impl FormatterConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for FormatterConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FormatterConfigError {}

impl FormatterConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, FormatterConfigError> {
        let text = fs::read_to_string(path).map_err(|err| {
            FormatterConfigError::new(format!("failed to read '{}': {err}", path.display()))
        })?;
        Self::parse_toml(path, &text)
    }

    fn parse_toml(path: &Path, source: &str) -> Result<Self, FormatterConfigError> {
        let mut config = Self::default();
        let mut section = ConfigSection::Root;
        let mut seen_keys = HashSet::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_toml_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(config_error(path, line_no, "invalid section header"));
                }
                let name = line[1..line.len() - 1].trim();
                section = if name.eq_ignore_ascii_case("formatter") {
                    ConfigSection::Formatter
                } else {
                    ConfigSection::Other
                };
                continue;
            }

            if section == ConfigSection::Other {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                return Err(config_error(path, line_no, "expected key = value"));
            };
            let key = raw_key.trim();
            let value = raw_value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(config_error(path, line_no, "expected key = value"));
            }

            let canonical_key = normalize_key(key);
            if !seen_keys.insert(canonical_key.clone()) {
                return Err(config_error(
                    path,
                    line_no,
                    format!("duplicate key '{}'", key),
                ));
            }

            match canonical_key.as_str() {
                "indent" => {
                    let indent = parse_string(path, line_no, key, value)?;
                    if indent.is_empty() {
                        return Err(config_error(path, line_no, "'indent' must not be empty"));
                    }
                    config.indent = indent;
                }
                "keyword_case" => {
                    config.keyword_case = parse_case_style(path, line_no, key, value)?
                }
                "inline_lookahead" => {
                    config.inline_lookahead = parse_usize(path, line_no, key, value, true)?
                }
                "inline_reflow_limit" => {
                    config.inline_reflow_limit = parse_usize(path, line_no, key, value, true)?
                }
                _ => {
                    return Err(config_error(
                        path,
                        line_no,
                        format!("unknown key '{}'", key),
                    ));
                }
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSection {
    Root,
    Formatter,
    Other,
}

fn config_error(path: &Path, line_no: usize, message: impl Into<String>) -> FormatterConfigError {
    FormatterConfigError::new(format!(
        "{}:{}: {}",
        path.display(),
        line_no,
        message.into()
    ))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_usize(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
    minimum_one: bool,
) -> Result<usize, FormatterConfigError> {
    let normalized = value.trim().replace('_', "");
    let parsed = normalized.parse::<usize>().map_err(|_| {
        config_error(
            path,
            line_no,
            format!("invalid integer for '{}': {}", key, value),
        )
    })?;
    if minimum_one && parsed == 0 {
        return Err(config_error(
            path,
            line_no,
            format!("'{}' must be >= 1", key),
        ));
    }
    Ok(parsed)
}

fn parse_string(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<String, FormatterConfigError> {
    let value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        return Ok(unescape(&value[1..value.len() - 1]));
    }
    if value.contains(' ') || value.contains('\t') {
        return Err(config_error(
            path,
            line_no,
            format!("invalid string for '{}': {}", key, value),
        ));
    }
    Ok(value.to_string())
}

// Indent units are commonly written as "\t" in the config file.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_case_style(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<CaseStyle, FormatterConfigError> {
    let normalized = parse_string(path, line_no, key, value)?;
    match normalized.to_ascii_lowercase().as_str() {
        "keep" => Ok(CaseStyle::Keep),
        "upper" => Ok(CaseStyle::Upper),
        "lower" => Ok(CaseStyle::Lower),
        _ => Err(config_error(
            path,
            line_no,
            format!("invalid case style for '{}': {}", key, value),
        )),
    }
}

fn strip_toml_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single && !escaped => in_double = !in_double,
            '#' if !in_single && !in_double => return &line[..idx],
            _ => {}
        }

        escaped = in_double && ch == '\\' && !escaped;
        if ch != '\\' {
            escaped = false;
        }
    }
    line
}
