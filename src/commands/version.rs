//! Implementation of the `cmdgate version` command.

use std::io::Write;

use clap::Parser;

use crate::{
    commands::clap_help,
    error::Result,
    handler::{Context, Handler, parse_params},
};

/// Parameters for `version`.
#[derive(Debug, Parser)]
#[command(about = "Print the cmdgate version")]
struct VersionArgs {}

/// Prints the package version.
#[derive(Debug, Clone, Copy)]
pub struct Version;

impl Handler for Version {
    fn summary(&self) -> &str {
        "Print the cmdgate version"
    }

    fn help(&self) -> Option<String> {
        Some(clap_help::<VersionArgs>("version"))
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        if parse_params::<VersionArgs>(ctx, params)?.is_none() {
            return Ok(());
        }
        writeln!(ctx.out(), "cmdgate {}", env!("CARGO_PKG_VERSION"))?;
        Ok(())
    }
}
