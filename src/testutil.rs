//! Test utilities for exercising handlers and dispatch.
//!
//! This module provides stub handlers, an in-memory [`Harness`] for running
//! a handler against captured streams, and [`DataFixture`] for commands that
//! read and write files.

#![allow(dead_code)]

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    config::Config,
    dispatch::Dispatcher,
    error::Error,
    handler::{Context, FnHandler, Handler},
    registry::Registry,
    window::{ARG_OFFSET, ArgumentWindow},
};

/// A handler that always succeeds without output.
pub fn succeed() -> impl Handler {
    FnHandler::new("succeed", |_ctx: &mut Context<'_>, _params: &[String]| Ok(()))
}

/// A handler that prints its parameters separated by spaces.
pub fn echo() -> impl Handler {
    FnHandler::new("echo parameters", |ctx: &mut Context<'_>, params: &[String]| {
        writeln!(ctx.out(), "{}", params.join(" "))?;
        Ok(())
    })
}

/// A handler that fails with the given code and message.
pub fn fail(code: u8, message: &'static str) -> impl Handler {
    FnHandler::new("fail", move |_ctx: &mut Context<'_>, _params: &[String]| {
        Err(Error::failed(code, message))
    })
}

/// A handler that panics with the given message.
pub fn panic_with(message: &'static str) -> impl Handler {
    FnHandler::new("panic", move |_ctx: &mut Context<'_>, _params: &[String]| {
        panic!("{message}")
    })
}

/// Build a window as the process would see it, program path first.
pub fn window(tokens: &[&str]) -> ArgumentWindow {
    let vector = ["cmdgate"]
        .iter()
        .chain(tokens)
        .map(|token| (*token).to_string())
        .collect();
    ArgumentWindow::new(vector, ARG_OFFSET)
}

/// Captured result of a dispatch run.
#[derive(Debug)]
pub struct Run {
    /// Exit code.
    pub code: u8,
    /// Captured standard output.
    pub out: String,
    /// Captured error output.
    pub err: String,
}

/// Dispatch `tokens` against a registry with default config.
pub fn run_tokens(registry: &Registry, tokens: &[&str]) -> Run {
    run_with_config(registry, &Config::default(), tokens)
}

/// Dispatch `tokens` against a registry and config, capturing both streams.
pub fn run_with_config(registry: &Registry, config: &Config, tokens: &[&str]) -> Run {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = Dispatcher::new(registry, config, window(tokens))
        .resolve_exit_code_with(&mut out, &mut err);
    Run {
        code,
        out: String::from_utf8(out).expect("utf8 stdout"),
        err: String::from_utf8(err).expect("utf8 stderr"),
    }
}

/// Runs handlers directly against captured streams.
#[derive(Debug, Default)]
pub struct Harness {
    /// Config handed to handlers.
    config: Config,
    /// Registry handed to handlers.
    registry: Registry,
}

impl Harness {
    /// Create a harness with an empty registry and default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a harness over an explicit registry and config.
    pub fn with(registry: Registry, config: Config) -> Self {
        Self { config, registry }
    }

    /// Run `f` with a context named `command`, returning its result and captured output.
    pub fn with_context<R>(
        &self,
        command: &str,
        f: impl FnOnce(&mut Context<'_>) -> R,
    ) -> (R, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = {
            let mut ctx = Context::new(
                command,
                &mut out,
                &mut err,
                false,
                &self.config,
                &self.registry,
            );
            f(&mut ctx)
        };
        (
            result,
            String::from_utf8(out).expect("utf8 stdout"),
            String::from_utf8(err).expect("utf8 stderr"),
        )
    }
}

/// Temporary directory populated with data files.
pub struct DataFixture {
    /// Root temp directory.
    root: TempDir,
}

impl DataFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp dir"),
        }
    }

    /// Add a file relative to the fixture root.
    pub fn with_file(self, name: &str, contents: &str) -> Self {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a fixture file.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Absolute path of a fixture file as a parameter token.
    pub fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    /// Read a fixture file.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("read file")
    }
}
