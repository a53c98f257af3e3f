//! Command dispatch and the top-level failure-containment boundary.
//!
//! [`Dispatcher::dispatch`] selects a handler from the first token of the
//! argument window, runs it, and classifies what happened into an
//! [`Outcome`]. Selection and invocation run inside a single
//! `catch_unwind`, so a panic anywhere below resolves to
//! [`Outcome::UnhandledFault`] instead of crashing the process.
//!
//! While any boundary is active the default panic report is suppressed for
//! the whole process, so a worker thread spawned by a handler cannot print a
//! raw panic trace either. Suppressed panics are recorded with their message
//! and location; the boundary that owns them folds a worker's message into
//! the fault's cause. Panics while no boundary is active still reach the
//! previously installed hook.

use std::{
    any::Any,
    cell::Cell,
    io::{self, Write},
    panic::{self, AssertUnwindSafe},
    sync::{
        Mutex, Once, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, ThreadId},
};

use crate::{
    config::Config,
    error::{Error, Result},
    handler::Context,
    outcome::Outcome,
    registry::Registry,
    window::ArgumentWindow,
};

thread_local! {
    /// Number of dispatch boundaries active on this thread.
    static BOUNDARY_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Number of dispatch boundaries active anywhere in the process.
static ACTIVE_BOUNDARIES: AtomicUsize = AtomicUsize::new(0);

/// Panics suppressed by the hook, waiting to be claimed by a boundary.
static SUPPRESSED: Mutex<Vec<PanicRecord>> = Mutex::new(Vec::new());

/// Guards installation of the process-wide panic hook.
static HOOK: Once = Once::new();

/// A panic the hook kept from reaching the previous hook.
#[derive(Debug, Clone)]
struct PanicRecord {
    /// Thread that panicked.
    thread: ThreadId,
    /// Whether that thread was itself inside a boundary.
    in_boundary: bool,
    /// Panic message.
    message: String,
    /// Source location, as `file:line`.
    location: Option<String>,
}

/// Install the panic hook that silences panics while a boundary is active.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let depth = BOUNDARY_DEPTH.with(Cell::get);
            if depth == 0 && ACTIVE_BOUNDARIES.load(Ordering::SeqCst) == 0 {
                previous(info);
                return;
            }
            let record = PanicRecord {
                thread: thread::current().id(),
                in_boundary: depth > 0,
                message: describe_panic(info.payload()),
                location: info
                    .location()
                    .map(|location| format!("{}:{}", location.file(), location.line())),
            };
            SUPPRESSED
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
        }));
    });
}

/// Marks the current thread as inside a dispatch boundary until dropped.
struct Boundary;

impl Boundary {
    /// Enter a boundary on the current thread.
    fn enter() -> Self {
        install_hook();
        ACTIVE_BOUNDARIES.fetch_add(1, Ordering::SeqCst);
        BOUNDARY_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }

    /// Take the panics recorded on this thread and on threads outside any
    /// boundary, oldest first.
    fn take_panics(&self) -> Vec<PanicRecord> {
        let current = thread::current().id();
        let mut suppressed = SUPPRESSED.lock().unwrap_or_else(PoisonError::into_inner);
        let (mine, rest): (Vec<_>, Vec<_>) = suppressed
            .drain(..)
            .partition(|record| record.thread == current || !record.in_boundary);
        *suppressed = rest;
        mine
    }
}

impl Drop for Boundary {
    fn drop(&mut self) {
        BOUNDARY_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
        ACTIVE_BOUNDARIES.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Describe a panic payload.
fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown fault".to_string()
    }
}

/// Build the cause for a contained fault from its payload and the panics
/// recorded while it unwound.
fn fault_cause(payload: &(dyn Any + Send), panics: &[PanicRecord]) -> String {
    let current = thread::current().id();
    let cause = describe_panic(payload);
    match panics.iter().find(|record| record.thread != current) {
        Some(worker) => format!("{cause} (worker thread panicked: {})", worker.message),
        None => cause,
    }
}

/// Stages of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet run.
    Idle,
    /// Choosing a handler from the window.
    Selecting,
    /// Running the selected handler.
    Invoking,
    /// Turning the handler result into an outcome.
    Classifying,
    /// Outcome produced.
    Resolved,
}

/// Selects and runs one command, resolving it to an exit code.
#[derive(Debug)]
pub struct Dispatcher<'r> {
    /// Commands to choose from.
    registry: &'r Registry,
    /// Configuration passed through to handlers.
    config: &'r Config,
    /// Arguments for this run.
    window: ArgumentWindow,
    /// Whether handlers may colorize standard output.
    use_color: bool,
    /// Whether diagnostics on the error channel may be colorized.
    err_color: bool,
    /// Current stage.
    phase: Cell<Phase>,
}

impl<'r> Dispatcher<'r> {
    /// Create a dispatcher over a registry and an argument window.
    pub fn new(registry: &'r Registry, config: &'r Config, window: ArgumentWindow) -> Self {
        Self {
            registry,
            config,
            window,
            use_color: false,
            err_color: false,
            phase: Cell::new(Phase::Idle),
        }
    }

    /// Enable or disable colored output on both channels.
    #[must_use]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self.err_color = use_color;
        self
    }

    /// Enable or disable colored diagnostics on the error channel only.
    #[must_use]
    pub fn with_error_color(mut self, err_color: bool) -> Self {
        self.err_color = err_color;
        self
    }

    /// Current stage of the dispatch.
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Record a stage transition.
    fn enter(&self, phase: Phase) {
        tracing::debug!(from = ?self.phase.get(), to = ?phase, "dispatch phase");
        self.phase.set(phase);
    }

    /// Run the selected command and classify the result.
    ///
    /// Always returns. Handler errors become [`Outcome::HandledFailure`],
    /// panics become [`Outcome::UnhandledFault`].
    pub fn dispatch(&self, out: &mut dyn Write, err: &mut dyn Write) -> Outcome {
        self.enter(Phase::Selecting);
        let boundary = Boundary::enter();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.select_and_invoke(&mut *out, &mut *err)
        }));
        let panics = boundary.take_panics();
        drop(boundary);
        for record in &panics {
            tracing::debug!(
                message = %record.message,
                location = record.location.as_deref().unwrap_or("unknown"),
                thread = ?record.thread,
                "suppressed panic"
            );
        }

        self.enter(Phase::Classifying);
        let outcome = match result {
            Ok(Ok(())) => Outcome::Success,
            Ok(Err(error)) => Outcome::failure(error.exit_code(), error.to_string()),
            Err(payload) => {
                let cause = fault_cause(&*payload, &panics);
                tracing::debug!(%cause, "contained fault");
                let cause = match self.window.split_command() {
                    Some((command, _)) => format!("command '{command}' failed: {cause}"),
                    None => cause,
                };
                Outcome::UnhandledFault { cause }
            }
        };
        self.enter(Phase::Resolved);
        outcome
    }

    /// Choose a handler and run it. Everything here runs inside the boundary.
    fn select_and_invoke(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        let (resolved, params) = match self.window.split_command() {
            Some((token, params)) => {
                let resolved =
                    self.registry
                        .resolve(token)
                        .ok_or_else(|| Error::UnknownCommand {
                            name: token.to_string(),
                        })?;
                (resolved, params)
            }
            None => (
                self.registry.resolve_default().ok_or(Error::NoCommand)?,
                &[][..],
            ),
        };
        let params: Vec<String> = resolved.prefix.iter().chain(params).cloned().collect();

        self.enter(Phase::Invoking);
        tracing::debug!(command = resolved.name, params = params.len(), "invoking handler");
        let mut ctx = Context::new(
            resolved.name,
            out,
            err,
            self.use_color,
            self.config,
            self.registry,
        )
        .with_error_color(self.err_color);
        resolved.handler.run(&mut ctx, &params)
    }

    /// Dispatch, report the outcome on `err`, and return its exit code.
    pub fn resolve_exit_code_with(&self, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
        let outcome = self.dispatch(out, err);
        if let Err(error) = out.flush() {
            tracing::debug!(%error, "failed to flush output");
        }
        outcome.report(err, self.err_color);
        outcome.exit_code()
    }

    /// Dispatch against the process's standard streams.
    pub fn resolve_exit_code(&self) -> u8 {
        let stdout = io::stdout();
        let stderr = io::stderr();
        let mut out = stdout.lock();
        let mut err = stderr.lock();
        self.resolve_exit_code_with(&mut out, &mut err)
    }
}
