//! Shared `slog` setup. Production code builds its logger once at startup and threads it through
//! every component by value (`slog::Logger` is a cheap `Arc` clone internally); tests use
//! `test_logger()` so failures print to stdout without any async-drain teardown dance.

use slog::{o, Drain};
use std::sync::Mutex;

/// The async, terminal-decorated drain used by long-running node/validator processes.
pub fn build_drain(debug_level: &str) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let decorated = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(decorated).build().fuse();

    let level = debug_level
        .parse::<slog::Level>()
        .unwrap_or(slog::Level::Info);

    let drain = slog::LevelFilter::new(drain, level).fuse();

    slog::Logger::root(drain, o!())
}

/// A synchronous, unbuffered logger for tests: every log line is flushed immediately, so it
/// appears interleaved correctly with `panic!` output and `cargo test -- --nocapture`.
pub fn test_logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = Mutex::new(drain).fuse();
    slog::Logger::root(drain, o!())
}

/// A logger that discards everything. Useful for benchmark-style call sites that need a
/// `Logger` value but have no interest in its output.
pub fn null_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, o!())
}
