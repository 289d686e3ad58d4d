//! Semantic error types for the cfapps application.
//!
//! This module defines the error hierarchy for cfapps, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect or map to a module failure, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.
//!
//! No variant carries credential material. Messages are built from names,
//! GUIDs, HTTP statuses, and backend error descriptions only.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// The Ansible module argument file is not usable.
    #[error("invalid module arguments: {message}")]
    ModuleArgs {
        /// A description of the problem. Never includes parameter values.
        message: String,
    },

    /// One or more required parameters are missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The names of the missing fields, comma separated.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// The kind of named Cloud Foundry resource being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// An organization.
    Organization,
    /// A space within an organization.
    Space,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => f.write_str("organization"),
            Self::Space => f.write_str("space"),
        }
    }
}

/// Errors raised by the lookup pipeline and its Cloud Foundry client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The credentials were rejected or the endpoint could not be reached.
    #[error("Cloud Foundry authentication failed: {message}")]
    Authentication {
        /// A description of the authentication failure.
        message: String,
    },

    /// A name did not resolve to exactly one identifier.
    #[error("{}", not_found_message(.resource, .name, .matches))]
    NotFound {
        /// The kind of resource that was looked up.
        resource: Resource,
        /// The name that was looked up.
        name: String,
        /// How many resources the backend returned for the name.
        matches: usize,
    },

    /// The backend or the network failed while serving a request.
    #[error("Cloud Foundry request failed: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },

    /// Any other failure.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// A description of the failure.
        message: String,
    },
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes variant fields by reference"
)]
fn not_found_message(resource: &Resource, name: &str, matches: &usize) -> String {
    if *matches == 0 {
        format!("{resource} '{name}' not found")
    } else {
        format!("{resource} name '{name}' is ambiguous: {matches} matches")
    }
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied when accessing a path.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

impl FilesystemError {
    /// Classify an I/O error raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::IoError {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// Top-level error type for the cfapps application.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to a module failure or an `eyre::Report`.
#[derive(Debug, Error)]
pub enum CfAppsError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred during the lookup.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// An error occurred during filesystem operations.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for cfapps operations.
pub type Result<T> = std::result::Result<T, CfAppsError>;
