//! Implementation of the `cmdgate convert` command.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::{
    commands::clap_help,
    error::{Error, Result},
    format::Format,
    handler::{Context, Handler, parse_params},
    paths::{display_path, normalize_path},
};

/// Output path that means standard output.
const STDOUT: &str = "-";

/// Parameters for `convert`.
#[derive(Debug, Parser)]
#[command(about = "Convert structured data between JSON, YAML and TOML")]
struct ConvertArgs {
    /// File to read.
    input: PathBuf,
    /// File to write, or `-` for standard output.
    output: PathBuf,
    /// Input format (inferred from the input extension by default).
    #[arg(long, value_enum)]
    from: Option<Format>,
    /// Output format (inferred from the output extension by default).
    #[arg(long, value_enum)]
    to: Option<Format>,
    /// Overwrite an existing output file.
    #[arg(long, short = 'f')]
    force: bool,
}

impl ConvertArgs {
    /// Whether the output goes to standard output.
    fn to_stdout(&self) -> bool {
        self.output.as_os_str() == STDOUT
    }
}

/// Converts a document from one format to another.
#[derive(Debug, Clone, Copy)]
pub struct Convert;

impl Handler for Convert {
    fn summary(&self) -> &str {
        "Convert structured data between JSON, YAML and TOML"
    }

    fn help(&self) -> Option<String> {
        Some(clap_help::<ConvertArgs>("convert"))
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        let Some(args) = parse_params::<ConvertArgs>(ctx, params)? else {
            return Ok(());
        };
        convert(ctx, &args)
    }
}

/// Execute a conversion.
fn convert(ctx: &mut Context<'_>, args: &ConvertArgs) -> Result<()> {
    let from = match args.from {
        Some(format) => format,
        None => Format::from_path(&args.input)?,
    };
    let to = match (args.to, args.to_stdout()) {
        (Some(format), _) => format,
        (None, true) => {
            return Err(Error::Usage {
                message: "--to is required when writing to standard output".to_string(),
            });
        }
        (None, false) => Format::from_path(&args.output)?,
    };

    if !args.to_stdout() {
        check_output(&args.input, &args.output, args.force)?;
    }

    let text = read_input(&args.input)?;
    let value = from.parse(&text, &args.input)?;
    let rendered = to.render(&value)?;
    tracing::debug!(%from, %to, bytes = rendered.len(), "converted document");

    if args.to_stdout() {
        ctx.out().write_all(rendered.as_bytes())?;
        return Ok(());
    }

    fs::write(&args.output, rendered).map_err(|error| Error::OutputWrite {
        path: args.output.clone(),
        source: error,
    })?;
    writeln!(
        ctx.out(),
        "Converted {} ({from}) -> {} ({to})",
        display_path(&args.input),
        display_path(&args.output)
    )?;
    Ok(())
}

/// Refuse to overwrite the input or an existing output without `--force`.
fn check_output(input: &Path, output: &Path, force: bool) -> Result<()> {
    if normalize_path(input) == normalize_path(output) {
        return Err(Error::Usage {
            message: format!("input and output are the same file: {}", input.display()),
        });
    }
    if output.exists() && !force {
        return Err(Error::OutputExists {
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Read an input file, distinguishing missing files from other failures.
fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => Error::InputMissing {
            path: path.to_path_buf(),
        },
        _ => Error::InputRead {
            path: path.to_path_buf(),
            source: error,
        },
    })
}
