//! The contract between the dispatcher and pluggable command handlers.

use std::{
    ffi::OsString,
    fmt,
    io::Write,
    iter,
};

use clap::{Parser, error::ErrorKind};

use crate::{
    config::Config,
    error::{Error, Result},
    outcome::emit,
    palette,
    registry::Registry,
};

/// A unit of command logic the dispatcher can invoke.
///
/// Returning `Ok(())` is a success. Returning an [`Error`] is a handled failure
/// that exits with [`Error::exit_code`]. A panic is treated as an internal fault
/// and contained by the dispatcher.
pub trait Handler {
    /// One-line description shown in the command listing.
    fn summary(&self) -> &str;

    /// Detailed help text for `help <command>`, if the handler has any.
    fn help(&self) -> Option<String> {
        None
    }

    /// Run the command with the tokens following the command name.
    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()>;
}

impl fmt::Debug for dyn Handler + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("summary", &self.summary())
            .finish()
    }
}

/// Adapts a closure into a [`Handler`].
pub struct FnHandler<F> {
    /// One-line description.
    summary: String,
    /// Command body.
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&mut Context<'_>, &[String]) -> Result<()>,
{
    /// Wrap `func` as a handler with the given summary.
    pub fn new(summary: impl Into<String>, func: F) -> Self {
        Self {
            summary: summary.into(),
            func,
        }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Context<'_>, &[String]) -> Result<()>,
{
    fn summary(&self) -> &str {
        &self.summary
    }

    fn run(&self, ctx: &mut Context<'_>, params: &[String]) -> Result<()> {
        (self.func)(ctx, params)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    /// Name the handler was invoked under.
    command: &'a str,
    /// Channel for normal results.
    out: &'a mut dyn Write,
    /// Channel for warnings and diagnostics.
    err: &'a mut dyn Write,
    /// Whether output may be colorized.
    use_color: bool,
    /// Whether warnings on the error channel may be colorized.
    err_color: bool,
    /// Effective configuration.
    config: &'a Config,
    /// Registry the handler was selected from.
    registry: &'a Registry,
}

impl<'a> Context<'a> {
    /// Build a context for one handler invocation.
    pub fn new(
        command: &'a str,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
        use_color: bool,
        config: &'a Config,
        registry: &'a Registry,
    ) -> Self {
        Self {
            command,
            out,
            err,
            use_color,
            err_color: use_color,
            config,
            registry,
        }
    }

    /// Decide coloring for the error channel separately from stdout.
    #[must_use]
    pub fn with_error_color(mut self, err_color: bool) -> Self {
        self.err_color = err_color;
        self
    }

    /// Name of the command being run.
    pub fn command(&self) -> &'a str {
        self.command
    }

    /// Standard output channel.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Error channel, for warnings that do not end the command.
    pub fn err(&mut self) -> &mut dyn Write {
        &mut *self.err
    }

    /// Whether output may be colorized.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Effective configuration.
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Registry of available commands.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Print a warning to the error channel.
    pub fn warn(&mut self, message: impl fmt::Display) {
        let prefix = palette::paint("warning:", palette::warning(), self.err_color);
        emit(self.err, format_args!("{prefix} {message}\n"));
    }
}

/// Parse handler parameters with clap.
///
/// Returns `Ok(None)` when clap printed help or version text, which callers
/// should treat as a completed command.
pub fn parse_params<T: Parser>(ctx: &mut Context<'_>, params: &[String]) -> Result<Option<T>> {
    let bin_name = format!("cmdgate {}", ctx.command());
    let argv = iter::once(OsString::from(bin_name)).chain(params.iter().map(OsString::from));
    match T::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(ctx.out(), "{}", error.render())?;
            Ok(None)
        }
        Err(error) => {
            let rendered = error.render().to_string();
            let message = rendered.strip_prefix("error: ").unwrap_or(&rendered);
            Err(Error::Usage {
                message: message.trim_end().to_string(),
            })
        }
    }
}
