//! Clap command definition.

use clap::{Arg, ArgAction, Command};

/// Build the `mt-fs-tests` command.
pub fn build_cli() -> Command {
    Command::new("mt-fs-tests")
        .about("Races filesystem operations across synchronized threads")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML file with suite parameters (work_dir, [open_during_create], [bonnie64])"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print the registered suite names and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threads")
                .value_name("THREAD_COUNT")
                .allow_negative_numbers(true)
                .help("Threads per multi-threaded suite (default: 500)"),
        )
        .arg(
            Arg::new("runs")
                .value_name("RUN_COUNT")
                .allow_negative_numbers(true)
                .help("Times the selection is executed (default: 1)"),
        )
        .arg(
            Arg::new("suite")
                .value_name("SUITE")
                .help("Suite to run, or `all` (default: all)"),
        )
}
