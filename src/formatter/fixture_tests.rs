// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::path::{Path, PathBuf};

use super::{CaseStyle, FormatterConfig, FormatterEngine};

const FIXTURE_STEMS: &[&str] = &[
    "select_where_and",
    "messy_whitespace",
    "insert_values",
    "nested_subquery",
    "joins_and_comments",
    "group_order_limit",
    "update_set",
];

#[test]
fn formatter_golden_snapshots_match_fixture_expectations() {
    let engine = FormatterEngine::new(FormatterConfig::default());
    for stem in FIXTURE_STEMS {
        let input = read_fixture(stem, "input");
        let expected = read_fixture(stem, "expected");
        let output = engine.format_source_with_diagnostics(&input);
        assert_eq!(
            output.rendered, expected,
            "formatter fixture mismatch for {stem}"
        );
    }
}

#[test]
fn formatter_is_idempotent_across_fixture_corpus() {
    let engine = FormatterEngine::new(FormatterConfig::default());
    for stem in FIXTURE_STEMS {
        let expected = read_fixture(stem, "expected");
        let once = engine.format_source(&expected);
        let twice = engine.format_source(&once);
        assert_eq!(once, twice, "formatter idempotence failed for {stem}");
    }
}

#[test]
fn fixture_corpus_produces_no_diagnostics() {
    let engine = FormatterEngine::new(FormatterConfig::default());
    for stem in FIXTURE_STEMS {
        let input = read_fixture(stem, "input");
        let output = engine.format_source_with_diagnostics(&input);
        assert!(
            output.diagnostics.is_empty(),
            "unexpected diagnostics for {stem}: {:?}",
            output.diagnostics
        );
    }
}

#[test]
fn keyword_case_fixture_applies_when_upper_is_configured() {
    let engine = FormatterEngine::new(FormatterConfig {
        keyword_case: CaseStyle::Upper,
        ..FormatterConfig::default()
    });
    let input = read_fixture("keyword_case_upper", "input");
    let expected = read_fixture("keyword_case_upper", "expected");
    let output = engine.format_source_with_diagnostics(&input);
    assert_eq!(output.rendered, expected);
}

fn read_fixture(stem: &str, kind: &str) -> String {
    let path = fixture_path(stem, kind);
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("missing fixture {}: {err}", path.display());
    })
}

fn fixture_path(stem: &str, kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("formatter")
        .join("fixtures")
        .join(format!("{stem}.{kind}.sql"))
}
