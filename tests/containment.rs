use std::{
    env,
    io::Write,
    iter,
    process::{self, Command},
    thread,
};

use cmdgate::{
    ARG_OFFSET, ArgumentWindow, CasePolicy, Config, Context, Dispatcher, Error, FnHandler,
    INTERNAL_FAULT, Outcome, Phase, Registry,
};

fn registry() -> Registry {
    let mut registry = Registry::new(CasePolicy::Insensitive);
    registry
        .register(
            "greet",
            FnHandler::new("greet", |ctx: &mut Context<'_>, params: &[String]| {
                writeln!(ctx.out(), "hello {}", params.join(" "))?;
                Ok(())
            }),
        )
        .unwrap();
    registry
        .register(
            "refuse",
            FnHandler::new("refuse", |_ctx: &mut Context<'_>, _params: &[String]| {
                Err(Error::failed(3, "refused"))
            }),
        )
        .unwrap();
    registry
        .register(
            "explode",
            FnHandler::new("explode", |ctx: &mut Context<'_>, _params: &[String]| {
                writeln!(ctx.out(), "partial")?;
                let items: Vec<u8> = Vec::new();
                let index = items.len() + 3;
                let value = items[index];
                writeln!(ctx.out(), "{value}")?;
                Ok(())
            }),
        )
        .unwrap();
    registry
}

fn window(tokens: &[&str]) -> ArgumentWindow {
    let vector = iter::once("host")
        .chain(tokens.iter().copied())
        .map(str::to_string)
        .collect();
    ArgumentWindow::new(vector, ARG_OFFSET)
}

fn run(registry: &Registry, tokens: &[&str]) -> (u8, String, String) {
    let config = Config::default();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = Dispatcher::new(registry, &config, window(tokens))
        .resolve_exit_code_with(&mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn success_passes_parameters_through() {
    let registry = registry();
    let (code, out, err) = run(&registry, &["GREET", "a", "b"]);
    assert_eq!(code, 0);
    assert_eq!(out, "hello a b\n");
    assert!(err.is_empty());
}

#[test]
fn handled_failure_keeps_handler_code() {
    let registry = registry();
    let (code, _, err) = run(&registry, &["refuse"]);
    assert_eq!(code, 3);
    assert_eq!(err, "error: refused\n");
}

#[test]
fn fault_is_contained_and_reported() {
    let registry = registry();
    let (code, out, err) = run(&registry, &["explode"]);
    assert_eq!(code, INTERNAL_FAULT);
    assert_eq!(out, "partial\n");
    assert!(err.starts_with("internal error: "));
    assert!(err.contains("index out of bounds"));
    assert!(!err.contains("panicked at"));

    let (code, out, _) = run(&registry, &["greet", "again"]);
    assert_eq!(code, 0);
    assert_eq!(out, "hello again\n");
}

#[test]
fn dispatch_resolves_to_one_outcome() {
    let registry = registry();
    let config = Config::default();
    let dispatcher = Dispatcher::new(&registry, &config, window(&["explode"]));
    assert_eq!(dispatcher.phase(), Phase::Idle);

    let outcome = dispatcher.dispatch(&mut Vec::new(), &mut Vec::new());
    assert!(matches!(outcome, Outcome::UnhandledFault { .. }));
    assert_eq!(dispatcher.phase(), Phase::Resolved);
}

/// Set in the child process that runs a dispatch whose worker thread panics.
const WORKER_CHILD_ENV: &str = "CMDGATE_WORKER_PANIC_CHILD";

#[test]
fn worker_thread_panic_is_contained() {
    if env::var_os(WORKER_CHILD_ENV).is_some() {
        let mut registry = Registry::new(CasePolicy::Sensitive);
        registry
            .register(
                "work",
                FnHandler::new("work", |ctx: &mut Context<'_>, _params: &[String]| {
                    let value = thread::spawn(|| -> u8 { panic!("worker exploded") })
                        .join()
                        .expect("worker joined");
                    writeln!(ctx.out(), "{value}")?;
                    Ok(())
                }),
            )
            .unwrap();
        let config = Config::default();
        let code = Dispatcher::new(&registry, &config, window(&["work"])).resolve_exit_code();
        process::exit(i32::from(code));
    }

    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", "worker_thread_panic_is_contained", "--nocapture"])
        .env(WORKER_CHILD_ENV, "1")
        .output()
        .unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(output.status.code(), Some(i32::from(INTERNAL_FAULT)), "{stderr}");
    assert!(stderr.starts_with("internal error: "), "{stderr}");
    assert!(stderr.contains("command 'work' failed"), "{stderr}");
    assert!(stderr.contains("worker exploded"), "{stderr}");
    assert!(!stderr.contains("panicked at"), "{stderr}");
    assert!(!stderr.contains("stack backtrace"), "{stderr}");
}
