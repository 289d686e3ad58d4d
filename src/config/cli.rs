//! Command-line argument definitions for cf-apps.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::secret::SecretString;

/// Command-line interface for cf-apps.
#[derive(Debug, Parser)]
#[command(name = "cf-apps")]
#[command(
    author,
    version,
    about = "List the applications deployed in a Cloud Foundry space"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up the applications in a space and print the report as JSON.
    List(ListArgs),

    /// Run as an Ansible module, reading parameters from a JSON file.
    Module(ModuleCommandArgs),
}

/// Arguments for the `list` subcommand.
///
/// Each flag overrides the matching configuration file and environment
/// value.
#[derive(Debug, Default, Parser)]
pub struct ListArgs {
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Cloud Foundry API endpoint.
    #[arg(long)]
    pub url: Option<String>,

    /// Account used to log in.
    #[arg(long)]
    pub username: Option<String>,

    /// Account password. Prefer `CFAPPS_PASSWORD` or the configuration file.
    #[arg(long)]
    pub password: Option<SecretString>,

    /// Organization name.
    #[arg(long)]
    pub org: Option<String>,

    /// Space name.
    #[arg(long)]
    pub space: Option<String>,
}

/// Arguments for the `module` subcommand.
#[derive(Debug, Parser)]
pub struct ModuleCommandArgs {
    /// Path of the JSON argument file written by Ansible.
    #[arg(required = true)]
    pub args_file: Utf8PathBuf,
}
