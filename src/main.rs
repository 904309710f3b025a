// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for sqlforge.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use sqlforge::cli::{validate_cli, Cli, CliRun, InputSource, OutputFormat};
use sqlforge::formatter::{
    collect_token_diagnostics, FormatMode, FormatterConfig, FormatterDiagnostic, FormatterEngine,
    FormatterRunReport,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let run = match validate_cli(&cli) {
        Ok(run) => run,
        Err(err) => {
            eprintln!("sqlforge: {err}");
            return ExitCode::from(2);
        }
    };
    match execute(&run) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("sqlforge: {err}");
            ExitCode::from(2)
        }
    }
}

fn execute(run: &CliRun) -> Result<ExitCode, Box<dyn Error>> {
    let config = match &run.config_file {
        Some(path) => FormatterConfig::load_from_path(path)?,
        None => FormatterConfig::default(),
    };
    let engine = FormatterEngine::new(config);

    match &run.source {
        InputSource::Files(paths) if run.mode != FormatMode::Stdout => {
            let report = engine.run_paths_with_report(paths, run.mode)?;
            print_run_report(&report, run);
            if run.mode == FormatMode::Check && report.summary.files_changed > 0 {
                Ok(ExitCode::from(1))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        InputSource::Files(paths) => {
            for path in paths {
                let input = fs::read_to_string(path)?;
                emit_formatted(&engine, &input, run, Some(path));
            }
            Ok(ExitCode::SUCCESS)
        }
        InputSource::Inline(sql) => {
            emit_formatted(&engine, sql, run, None);
            Ok(ExitCode::SUCCESS)
        }
        InputSource::Stdin => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            emit_formatted(&engine, &input, run, None);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn emit_formatted(engine: &FormatterEngine, input: &str, run: &CliRun, path: Option<&Path>) {
    let diagnostics = collect_token_diagnostics(&engine.tokenize_source(input));
    let statements: Vec<String> = if run.split {
        engine
            .split_source(input)
            .iter()
            .map(|statement| engine.format_source(statement))
            .collect()
    } else {
        vec![engine.format_source(input)]
    };

    if run.format == OutputFormat::Json {
        let payload = json!({
            "path": path.map(|p| p.to_string_lossy().to_string()),
            "formatted": statements.join("\n\n"),
            "statements": statements,
            "diagnostics": diagnostics_json(&diagnostics),
        });
        println!("{payload}");
        return;
    }

    println!("{}", statements.join("\n\n"));
    for diagnostic in &diagnostics {
        match path {
            Some(path) => eprintln!(
                "{}:{}: warning: {}",
                path.display(),
                diagnostic.line_number,
                diagnostic.message
            ),
            None => eprintln!(
                "line {}: warning: {}",
                diagnostic.line_number, diagnostic.message
            ),
        }
    }
}

fn print_run_report(report: &FormatterRunReport, run: &CliRun) {
    if run.format == OutputFormat::Json {
        let payload = json!({
            "summary": {
                "files_seen": report.summary.files_seen,
                "files_changed": report.summary.files_changed,
                "warnings": report.summary.warnings,
                "files_with_warnings": report.summary.files_with_warnings,
            },
            "files": report.files.iter().map(|file| {
                json!({
                    "path": file.path.to_string_lossy().to_string(),
                    "changed": file.changed,
                    "diagnostics": diagnostics_json(&file.diagnostics),
                })
            }).collect::<Vec<_>>(),
        });
        println!("{payload}");
        return;
    }

    for file in &report.files {
        for diagnostic in &file.diagnostics {
            eprintln!(
                "{}:{}: warning: {}",
                file.path.display(),
                diagnostic.line_number,
                diagnostic.message
            );
        }
        if file.changed {
            match run.mode {
                FormatMode::Check => println!("would reformat {}", file.path.display()),
                FormatMode::Write => println!("reformatted {}", file.path.display()),
                FormatMode::Stdout => {}
            }
        }
    }
    println!(
        "{} file(s) seen, {} changed, {} warning(s)",
        report.summary.files_seen, report.summary.files_changed, report.summary.warnings
    );
}

fn diagnostics_json(diagnostics: &[FormatterDiagnostic]) -> Vec<serde_json::Value> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            json!({
                "line": diagnostic.line_number,
                "message": diagnostic.message,
            })
        })
        .collect()
}
