//! Command line → [`CliAction`] conversion.
//!
//! Positional arguments follow the classic `threads runs suite` order, each
//! optional. Clap handles shape errors (unknown flags, too many positionals);
//! the counts themselves go through `parse_count` so that non-numeric input
//! and overflow keep their distinct exit codes.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::ArgMatches;
use mtfs_core::{
    parse_count, Error, Result, RunConfig, SuiteParams, SuiteSelection, DEFAULT_RUN_COUNT,
    DEFAULT_THREAD_COUNT,
};

use crate::commands::build_cli;

/// What the binary should do.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Execute the configured run.
    Run(RunConfig),
    /// Print the registered suite names.
    List,
    /// Print clap-rendered help or version text.
    Display(String),
}

/// Parse a full argument vector, program name included.
pub fn parse_args<I, T>(args: I) -> Result<CliAction>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match build_cli().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(CliAction::Display(e.to_string()))
                }
                _ => Err(Error::Usage(e.to_string())),
            }
        }
    };
    matches_to_action(&matches)
}

fn matches_to_action(matches: &ArgMatches) -> Result<CliAction> {
    if matches.get_flag("list") {
        return Ok(CliAction::List);
    }

    let thread_count = match matches.get_one::<String>("threads") {
        Some(raw) => {
            let parsed = parse_count("threadCount", raw)?;
            usize::try_from(parsed).map_err(|_| Error::NumberOutOfRange {
                what: "threadCount",
                value: raw.clone(),
            })?
        }
        None => DEFAULT_THREAD_COUNT,
    };

    let run_count = match matches.get_one::<String>("runs") {
        Some(raw) => parse_count("runCount", raw)?,
        None => DEFAULT_RUN_COUNT,
    };

    let selection = matches
        .get_one::<String>("suite")
        .map(|raw| SuiteSelection::parse(raw))
        .unwrap_or(SuiteSelection::All);

    let params = match matches.get_one::<String>("config") {
        Some(path) => SuiteParams::load(&PathBuf::from(path))?,
        None => SuiteParams::default(),
    };

    let config = RunConfig {
        thread_count,
        run_count,
        selection,
        params,
    };
    config.validate()?;
    Ok(CliAction::Run(config))
}
