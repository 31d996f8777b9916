//! mt-fs-tests: synchronized multi-threaded filesystem race harness.
//!
//! `mt-fs-tests [--config FILE] [THREAD_COUNT [RUN_COUNT [SUITE|all]]]`
//!
//! Exits 0 when every selected suite passed on every run, otherwise with the
//! errno of the first failure.

mod commands;
mod logging;
mod parse;

use std::process;

use mtfs_concurrency::Orchestrator;
use mtfs_core::Error;
use mtfs_suites::{run, Registry};
use tracing::error;

use parse::{parse_args, CliAction};

fn fail(e: &Error) -> ! {
    error!(errno = %e.errno(), "{}", e);
    process::exit(e.errno().raw())
}

fn main() {
    logging::init();

    let action = match parse_args(std::env::args_os()) {
        Ok(action) => action,
        Err(e) => {
            if let Error::Usage(text) = &e {
                eprintln!("{}", text);
                process::exit(e.errno().raw());
            }
            fail(&e)
        }
    };

    let registry = Registry::builtin();
    match action {
        CliAction::Display(text) => print!("{}", text),
        CliAction::List => {
            for name in registry.names() {
                println!("{}", name);
            }
        }
        CliAction::Run(config) => {
            if let Err(e) = run(&config, &registry, &Orchestrator::new()) {
                fail(&e);
            }
        }
    }
}
