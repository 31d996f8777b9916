//! Diagnostic output.
//!
//! Everything goes to stderr through `tracing`, tagged with source file and
//! line. Suite runs and fan-outs are spans, so each line also names the
//! operation it came from (`run_suite{suite=...}:fan_out{...}:`).
//! `RUST_LOG` overrides the default `info` filter, e.g.
//! `RUST_LOG=mtfs::bonnie64=debug` to follow bonnie64 setup phases.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Formatting subscriber writing through `make_writer`.
pub fn subscriber<W>(make_writer: W, filter: EnvFilter, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_ansi(ansi)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .finish()
}

/// Install the global stderr subscriber. Later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = std::io::stderr().is_terminal();
    let _ = tracing::subscriber::set_global_default(subscriber(std::io::stderr, filter, ansi));
}
