//! `cf-apps` application entry point.
//!
//! This binary lists the applications deployed in a Cloud Foundry space. It
//! uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Two subcommands are provided:
//! - `list` loads parameters with layered precedence via `OrthoConfig`
//!   (defaults, configuration file, `CFAPPS_*` environment variables, flags)
//!   and prints the report as JSON.
//! - `module` follows the Ansible binary-module protocol: parameters come from
//!   a JSON argument file and every outcome, including failure, is printed as
//!   one JSON object.

use std::process::ExitCode;

use cfapps::api::{self, FailureReport};
use cfapps::config::{Cli, Commands, ListArgs, ModuleArgs, ModuleCommandArgs, load_config};
use cfapps::error::{LookupError, Result as CfAppsResult};
use cfapps::logging;
use clap::Parser;
use eyre::{Report, Result as EyreResult};

/// Application entry point.
///
/// Parses the CLI and dispatches to the subcommand handler. Uses
/// `eyre::Result` so that `list` failures surface as readable reports.
fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::List(args) => list(args).map_err(Report::from)?,
        Commands::Module(args) => return module(args),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the lookup with layered configuration and print the report.
fn list(args: &ListArgs) -> CfAppsResult<()> {
    let config = load_config(args)?;
    logging::init(&config.log)?;

    let request = config.lookup_request()?;
    let report = api::run(&request, &config.http)?;
    emit(&report)
}

/// Run as an Ansible module.
///
/// Failures are reported on stdout as `{"failed": true, ...}` with a
/// non-zero exit code rather than through `eyre`.
fn module(args: &ModuleCommandArgs) -> EyreResult<ExitCode> {
    match run_module(args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            tracing::error!(%error, "module run failed");
            emit(&FailureReport::new(error.to_string())).map_err(Report::from)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load logging and HTTP settings from the environment layers, then look up
/// the apps named by the argument file.
fn run_module(args: &ModuleCommandArgs) -> CfAppsResult<()> {
    let config = load_config(&ListArgs::default())?;
    logging::init(&config.log)?;

    let request = ModuleArgs::from_file(&args.args_file)?.lookup_request()?;
    let report = api::run(&request, &config.http)?;
    emit(&report)
}

/// Print one JSON object on stdout.
#[expect(clippy::print_stdout, reason = "the JSON result is the program output")]
fn emit<T: serde::Serialize>(value: &T) -> CfAppsResult<()> {
    let rendered = serde_json::to_string(value).map_err(|e| LookupError::Unexpected {
        message: format!("failed to serialise result: {e}"),
    })?;
    println!("{rendered}");
    Ok(())
}
