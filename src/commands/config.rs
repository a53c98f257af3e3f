//! Implementation of the `cmdgate config` command.

use std::io::Write;

use clap::Parser;

use crate::{
    commands::clap_help,
    error::Result,
    handler::{Context, Handler, parse_params},
    palette,
    paths::{default_config_path, display_path},
};

/// Parameters for `config`.
#[derive(Debug, Parser)]
#[command(about = "Show the effective configuration")]
struct ConfigArgs {
    /// Print only the config file path.
    #[arg(long)]
    path: bool,
}

/// Shows the effective configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfigCommand;

impl Handler for ConfigCommand {
    fn summary(&self) -> &str {
        "Show the effective configuration"
    }

    fn help(&self) -> Option<String> {
        Some(clap_help::<ConfigArgs>("config"))
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        let Some(args) = parse_params::<ConfigArgs>(ctx, params)? else {
            return Ok(());
        };
        let config = ctx.config();
        let use_color = ctx.use_color();
        let path = match config.path() {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };

        if args.path {
            writeln!(ctx.out(), "{}", path.display())?;
            return Ok(());
        }

        let label = |text: &str| palette::paint(text, palette::label(), use_color);
        let status = if config.loaded() {
            ""
        } else {
            " (not found, using defaults)"
        };
        let out = ctx.out();
        writeln!(out, "{} {}{status}", label("path:"), display_path(&path))?;
        writeln!(
            out,
            "{} {}",
            label("default_command:"),
            config.default_command().unwrap_or("-")
        )?;
        writeln!(out, "{} {}", label("color:"), config.color().as_str())?;
        writeln!(out, "{} {}", label("log:"), config.log().unwrap_or("-"))?;
        if config.aliases().is_empty() {
            writeln!(out, "{} -", label("aliases:"))?;
        } else {
            writeln!(out, "{}", label("aliases:"))?;
            for (name, expansion) in config.aliases() {
                writeln!(out, "  {name} = {}", shell_words::join(expansion))?;
            }
        }
        Ok(())
    }
}
