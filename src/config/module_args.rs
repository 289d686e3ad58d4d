//! Ansible module argument parsing.
//!
//! Ansible runs a binary module with the path of a JSON file holding the task
//! parameters plus its own `_ansible_*` bookkeeping keys. This module reads
//! that file through a `cap_std` directory handle and validates the five
//! lookup parameters into a [`LookupRequest`].

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::request::LookupRequest;
use crate::error::{ConfigError, FilesystemError, Result};
use crate::scalar;
use crate::secret::SecretString;

/// Prefix of the internal keys Ansible adds to every argument file.
const ANSIBLE_INTERNAL_PREFIX: &str = "_ansible_";

/// Task parameters accepted by the module.
///
/// Fields are optional so that every missing parameter can be reported at
/// once by [`ModuleArgs::lookup_request`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleArgs {
    /// The Cloud Foundry API endpoint.
    #[serde(default, deserialize_with = "scalar::optional_string")]
    pub url: Option<String>,
    /// The account used to log in.
    #[serde(default, deserialize_with = "scalar::optional_string")]
    pub username: Option<String>,
    /// The account password.
    #[serde(default)]
    pub password: Option<SecretString>,
    /// The organization name.
    #[serde(default, deserialize_with = "scalar::optional_string")]
    pub org: Option<String>,
    /// The space name.
    #[serde(default, deserialize_with = "scalar::optional_string")]
    pub space: Option<String>,
}

impl ModuleArgs {
    /// Reads and parses an argument file.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError` if the file cannot be read, or
    /// `ConfigError::ModuleArgs` if it is not a JSON object of supported
    /// parameters.
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let (dir, file_name) = open_args_directory(path)?;
        Self::from_dir(&dir, file_name, path)
    }

    /// Reads an argument file relative to an open directory.
    ///
    /// # Errors
    ///
    /// See [`ModuleArgs::from_file`].
    pub fn from_dir(dir: &Dir, file_name: &str, display_path: &Utf8Path) -> Result<Self> {
        let contents = dir.read_to_string(file_name).map_err(|error| {
            FilesystemError::from_io(display_path.as_std_path().to_path_buf(), &error)
        })?;
        Self::from_json(&contents)
    }

    /// Parses argument file contents, ignoring `_ansible_*` keys.
    ///
    /// Numbers and booleans are accepted for every parameter and converted to
    /// strings, matching Ansible's `type='str'` coercion.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ModuleArgs` if the contents are not a JSON object,
    /// a parameter is not a scalar, or an unsupported parameter is present.
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: Map<String, Value> =
            serde_json::from_str(contents).map_err(|e| ConfigError::ModuleArgs {
                message: format!("not a JSON object: {e}"),
            })?;
        let params: Map<String, Value> = raw
            .into_iter()
            .filter(|(key, _)| !key.starts_with(ANSIBLE_INTERNAL_PREFIX))
            .collect();
        serde_json::from_value(Value::Object(params)).map_err(|e| {
            ConfigError::ModuleArgs {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the parameters into a [`LookupRequest`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` listing every missing parameter,
    /// or `ConfigError::InvalidValue` if `url` is not an `http`/`https` URL.
    pub fn lookup_request(&self) -> Result<LookupRequest> {
        LookupRequest::from_parts(
            self.url.as_deref(),
            self.username.as_deref(),
            self.password.as_ref(),
            self.org.as_deref(),
            self.space.as_deref(),
        )
    }
}

/// Open the parent directory of the argument file as a capability handle.
fn open_args_directory(path: &Utf8Path) -> Result<(Dir, &str)> {
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ConfigError::InvalidValue {
        field: String::from("args_file"),
        reason: format!("'{path}' does not name a file"),
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        FilesystemError::from_io(parent.as_std_path().to_path_buf(), &error)
    })?;
    Ok((dir, file_name))
}
