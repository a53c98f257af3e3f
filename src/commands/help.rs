//! Implementation of the `cmdgate help` command.

use std::{io::Write, iter};

use clap::Parser;

use crate::{
    commands::{clap_help, is_flag_alias},
    error::{Error, Result},
    handler::{Context, Handler, parse_params},
    palette,
};

/// Column width for wrapped summaries.
const WIDTH: usize = 80;

/// Exit codes listed at the end of the command listing.
const EXIT_CODES: &str = "0 success, 1 failure, 2 usage, 65 bad data, 66 missing input, \
    70 internal error, 73 cannot create output, 74 I/O error, 78 config error, \
    127 unknown command";

/// Parameters for `help`.
#[derive(Debug, Parser)]
#[command(about = "Show available commands or help for one command")]
struct HelpArgs {
    /// Command to describe.
    command: Option<String>,
}

/// Lists commands or prints a command's usage.
#[derive(Debug, Clone, Copy)]
pub struct Help;

impl Handler for Help {
    fn summary(&self) -> &str {
        "Show available commands or help for one command"
    }

    fn help(&self) -> Option<String> {
        Some(clap_help::<HelpArgs>("help"))
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        let Some(args) = parse_params::<HelpArgs>(ctx, params)? else {
            return Ok(());
        };
        match args.command {
            Some(name) => describe(ctx, &name),
            None => list(ctx),
        }
    }
}

/// Print help for a single command or alias.
fn describe(ctx: &mut Context<'_>, name: &str) -> Result<()> {
    let registry = ctx.registry();
    let resolved = registry
        .resolve(name)
        .ok_or_else(|| Error::UnknownCommand {
            name: name.to_string(),
        })?;

    if !resolved.prefix.is_empty() || resolved.name != name {
        let expansion = shell_words::join(
            iter::once(resolved.name).chain(resolved.prefix.iter().map(String::as_str)),
        );
        writeln!(ctx.out(), "'{name}' is an alias for '{expansion}'.\n")?;
    }

    match resolved.handler.help() {
        Some(help) => write!(ctx.out(), "{help}")?,
        None => writeln!(ctx.out(), "{} - {}", resolved.name, resolved.handler.summary())?,
    }
    Ok(())
}

/// Print the command listing.
fn list(ctx: &mut Context<'_>) -> Result<()> {
    let registry = ctx.registry();
    let use_color = ctx.use_color();
    let aliases: Vec<_> = registry
        .aliases()
        .filter(|(name, _)| !is_flag_alias(name))
        .collect();
    let column = registry
        .commands()
        .map(|(name, _)| name.len())
        .chain(aliases.iter().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0)
        + 2;

    let out = ctx.out();
    writeln!(out, "cmdgate {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Usage: cmdgate <command> [args...]")?;
    writeln!(out)?;
    writeln!(out, "{}", palette::paint("Commands:", palette::heading(), use_color))?;
    for (name, handler) in registry.commands() {
        let padded = format!("{name:<column$}");
        let painted = palette::paint(&padded, palette::command_name(), use_color);
        write_wrapped(out, &painted, handler.summary(), column)?;
    }

    if !aliases.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", palette::paint("Aliases:", palette::heading(), use_color))?;
        for (name, expansion) in &aliases {
            let padded = format!("{name:<column$}");
            let painted = palette::paint(&padded, palette::command_name(), use_color);
            let expansion = palette::paint(
                &shell_words::join(expansion.iter()),
                palette::description(),
                use_color,
            );
            writeln!(out, "  {painted}{expansion}")?;
        }
    }

    if let Some(default) = registry.default_command() {
        writeln!(out)?;
        let label = palette::paint("Default command:", palette::label(), use_color);
        writeln!(out, "{label} {default}")?;
    }

    writeln!(out)?;
    let label = palette::paint("Exit codes:", palette::label(), use_color);
    let options = textwrap::Options::new(WIDTH).subsequent_indent("  ");
    writeln!(out, "{}", textwrap::fill(&format!("{label} {EXIT_CODES}"), options))?;
    writeln!(out)?;
    writeln!(out, "Run `cmdgate help <command>` for details on a command.")?;
    Ok(())
}

/// Write a command row, wrapping the summary under its own column.
fn write_wrapped(out: &mut dyn Write, name: &str, summary: &str, column: usize) -> Result<()> {
    let indent = " ".repeat(column + 2);
    let options = textwrap::Options::new(WIDTH.saturating_sub(column + 2).max(20));
    let mut lines = textwrap::wrap(summary, options).into_iter();
    let first = lines.next().unwrap_or_default();
    writeln!(out, "  {name}{first}")?;
    for line in lines {
        writeln!(out, "{indent}{line}")?;
    }
    Ok(())
}
