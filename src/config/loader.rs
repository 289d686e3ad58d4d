//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence order
//! (lowest to highest): application defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! Layers are composed with `ortho_config::MergeComposer` rather than the derived
//! `load()` because the `list` subcommand owns its clap arguments, and because
//! typed environment values must fail fast instead of being silently ignored.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g.,
//! `CFAPPS_HTTP_SKIP_SSL_VALIDATION=maybe` instead of `true`/`false`) return an
//! error immediately. String fields (e.g., `CFAPPS_ORG`) are always accepted.
//!
//! Environment access goes through `mockable::Env` so the table can be tested
//! without touching the process environment.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, ListArgs};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `CFAPPS_URL`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["http", "timeout_secs"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "CFAPPS_URL",
        path: &["url"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CFAPPS_USERNAME",
        path: &["username"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CFAPPS_PASSWORD",
        path: &["password"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CFAPPS_ORG",
        path: &["org"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CFAPPS_SPACE",
        path: &["space"],
        var_type: EnvVarType::String,
    },
    // Log fields
    EnvVarSpec {
        env_var: "CFAPPS_LOG_FILE",
        path: &["log", "file"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CFAPPS_LOG_LEVEL",
        path: &["log", "level"],
        var_type: EnvVarType::String,
    },
    // HTTP fields
    EnvVarSpec {
        env_var: "CFAPPS_HTTP_TIMEOUT_SECS",
        path: &["http", "timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CFAPPS_HTTP_SKIP_SSL_VALIDATION",
        path: &["http", "skip_ssl_validation"],
        var_type: EnvVarType::Bool,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `CFAPPS_*` variable without keeping a
/// separate list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// The parent directory is opened with `cap_std::fs_utf8` and the file is read
/// relative to it.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Locate the configuration file for this invocation.
///
/// An explicit `--config` path must exist; otherwise the usual discovery
/// locations are searched and the first existing file wins.
fn resolve_config_path(args: &ListArgs) -> Result<Option<Utf8PathBuf>> {
    if let Some(path) = &args.config {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.as_std_path().to_path_buf(),
            }
            .into());
        }
        return Ok(Some(path.clone()));
    }

    let discovery = ConfigDiscovery::builder("cfapps")
        .env_var("CFAPPS_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".cfapps.toml")
        .build();
    Ok(discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok()))
}

/// Load configuration with full layer precedence from the process environment.
///
/// Sources, lowest precedence first:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (`--config`, `CFAPPS_CONFIG_PATH`, or discovery)
/// 3. Environment variables prefixed with `CFAPPS_`
/// 4. Flags from the `list` subcommand
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - A `--config` path that does not exist
/// - Malformed configuration files
/// - Invalid typed environment variable values (e.g., non-integer for
///   `CFAPPS_HTTP_TIMEOUT_SECS`)
/// - An HTTP timeout of zero
pub fn load_config(args: &ListArgs) -> Result<AppConfig> {
    load_config_with_env(args, &DefaultEnv::new())
}

/// Load configuration with full layer precedence from the given environment.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<E: Env>(args: &ListArgs, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from AppConfig::default()).
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    if let Some(path) = resolve_config_path(args)? {
        tracing::debug!(%path, "loading configuration file");
        load_config_file(&path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(args);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.http.validate()?;

    Ok(config)
}

/// Collect environment variables with the `CFAPPS_` prefix into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable (bool, u64)
/// has an unparseable value.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.trim().parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U64 => match raw_value.trim().parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["http", "timeout_secs"]`, this creates the intermediate
/// `http` object if needed and inserts `timeout_secs` within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
///
/// The password is written in clear into the merge layer because
/// `SecretString` serialises as a placeholder.
fn build_cli_overrides(args: &ListArgs) -> Value {
    let mut overrides = Map::new();

    let strings = [
        ("url", args.url.as_deref()),
        ("username", args.username.as_deref()),
        ("password", args.password.as_ref().map(|p| p.expose_secret())),
        ("org", args.org.as_deref()),
        ("space", args.space.as_deref()),
    ];
    for (key, value) in strings {
        if let Some(value) = value {
            overrides.insert(key.to_owned(), Value::String(value.to_owned()));
        }
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
