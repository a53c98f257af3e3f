//! Implementation of the `cmdgate validate` command.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use walkdir::WalkDir;

use crate::{
    commands::clap_help,
    diagnostics::Diagnostics,
    error::{Error, Result},
    format::Format,
    handler::{Context, Handler, parse_params},
    palette,
};

/// Parameters for `validate`.
#[derive(Debug, Parser)]
#[command(about = "Check that JSON, YAML and TOML files parse")]
struct ValidateArgs {
    /// Files or directories to check.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Parse every file as this format instead of inferring it.
    #[arg(long, value_enum)]
    format: Option<Format>,
}

/// Checks that data files parse.
#[derive(Debug, Clone, Copy)]
pub struct Validate;

impl Handler for Validate {
    fn summary(&self) -> &str {
        "Check that JSON, YAML and TOML files parse"
    }

    fn help(&self) -> Option<String> {
        Some(clap_help::<ValidateArgs>("validate"))
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        let Some(args) = parse_params::<ValidateArgs>(ctx, params)? else {
            return Ok(());
        };
        validate(ctx, &args)
    }
}

/// A file queued for validation.
#[derive(Debug)]
struct Candidate {
    /// Path to parse.
    path: PathBuf,
    /// Format to parse it as.
    format: Format,
}

/// Execute the validate command.
fn validate(ctx: &mut Context<'_>, args: &ValidateArgs) -> Result<()> {
    for path in &args.paths {
        if !path.exists() {
            return Err(Error::InputMissing { path: path.clone() });
        }
    }

    let mut diagnostics = Diagnostics::new();
    let candidates = collect(ctx, &mut diagnostics, &args.paths, args.format);
    if candidates.is_empty() {
        writeln!(ctx.out(), "No files to validate.")?;
        diagnostics.print_skipped_summary(ctx);
        return Ok(());
    }

    let use_color = ctx.use_color();
    let mut invalid = 0;
    for candidate in &candidates {
        let result = fs::read_to_string(&candidate.path)
            .map_err(|error| Error::InputRead {
                path: candidate.path.clone(),
                source: error,
            })
            .and_then(|text| candidate.format.parse(&text, &candidate.path));
        match result {
            Ok(_) => {
                let mark = palette::paint("ok", palette::ok(), use_color);
                writeln!(ctx.out(), "{mark} {}", candidate.path.display())?;
            }
            Err(error) => {
                invalid += 1;
                let mark = palette::paint("invalid", palette::invalid(), use_color);
                writeln!(ctx.out(), "{mark} {}", candidate.path.display())?;
                writeln!(ctx.out(), "    - {error}")?;
            }
        }
    }

    let mut summary = format!("{} valid, {invalid} invalid", candidates.len() - invalid);
    let warnings = diagnostics.warning_count();
    if warnings > 0 {
        summary.push_str(&format!(", {warnings} warning(s)"));
    }
    writeln!(ctx.out())?;
    writeln!(ctx.out(), "{summary}")?;
    diagnostics.print_skipped_summary(ctx);

    if invalid > 0 {
        return Err(Error::ValidationFailed { count: invalid });
    }
    Ok(())
}

/// Expand the requested paths into files with a known format.
///
/// Files named explicitly with an unknown format are skipped with a warning;
/// unknown files found while walking a directory are ignored silently.
fn collect(
    ctx: &mut Context<'_>,
    diagnostics: &mut Diagnostics,
    paths: &[PathBuf],
    forced: Option<Format>,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for path in paths {
        if !path.is_dir() {
            match forced.map_or_else(|| Format::from_path(path), Ok) {
                Ok(format) => candidates.push(Candidate {
                    path: path.clone(),
                    format,
                }),
                Err(error) => diagnostics.warn_skipped(ctx, path, error.to_string()),
            }
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if let Some(format) = forced.or_else(|| detect(entry.path())) {
                        candidates.push(Candidate {
                            path: entry.into_path(),
                            format,
                        });
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    let location = error.path().unwrap_or(path).to_path_buf();
                    diagnostics.warn_skipped(ctx, &location, error.to_string());
                }
            }
        }
    }
    candidates
}

/// Detect a format from a walked file's extension.
fn detect(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Format::from_extension)
}
