//! Configuration data types for cfapps.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use super::request::LookupRequest;
use crate::secret::SecretString;

/// Default filter directive for the log sink.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default timeout, in seconds, for each Cloud Foundry HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Log sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// File that receives log output. The file is truncated on start-up.
    /// When unset, logs are written to stderr.
    pub file: Option<Utf8PathBuf>,

    /// A `tracing` filter directive such as `debug` or `cfapps=trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: String::from(DEFAULT_LOG_LEVEL),
        }
    }
}

/// HTTP client configuration for the Cloud Foundry API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates (self-signed lab foundations).
    pub skip_ssl_validation: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            skip_ssl_validation: false,
        }
    }
}

impl HttpConfig {
    /// Validates the HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `timeout_secs` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.timeout_secs == 0 {
            return Err(crate::error::ConfigError::InvalidValue {
                field: String::from("http.timeout_secs"),
                reason: String::from("must be greater than zero"),
            }
            .into());
        }
        Ok(())
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `CFAPPS_CONFIG_PATH` environment variable
/// 2. `.cfapps.toml` in the current working directory
/// 3. `.cfapps.toml` in the home directory
/// 4. `~/.config/cfapps/config.toml` (XDG default)
///
/// The lookup parameters are optional here so that each layer may supply a
/// subset; [`AppConfig::lookup_request`] enforces that all of them are set.
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "CFAPPS",
    post_merge_hook,
    discovery(
        app_name = "cfapps",
        env_var = "CFAPPS_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".cfapps.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The Cloud Foundry API endpoint.
    pub url: Option<String>,

    /// The account used to log in.
    pub username: Option<String>,

    /// The account password.
    #[ortho_config(skip_cli)]
    pub password: Option<SecretString>,

    /// The organization to search.
    pub org: Option<String>,

    /// The space to list applications from.
    pub space: Option<String>,

    /// Log sink configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub log: LogConfig,

    /// HTTP client configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub http: HttpConfig,
}

impl AppConfig {
    /// Validates the lookup parameters into a [`LookupRequest`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` listing every parameter that is
    /// unset or blank, or `ConfigError::InvalidValue` if `url` is not an
    /// `http`/`https` URL.
    pub fn lookup_request(&self) -> crate::error::Result<LookupRequest> {
        LookupRequest::from_parts(
            self.url.as_deref(),
            self.username.as_deref(),
            self.password.as_ref(),
            self.org.as_deref(),
            self.space.as_deref(),
        )
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        if let Some(url) = self.url.as_mut() {
            let trimmed = url.trim();
            if trimmed.len() != url.len() {
                *url = trimmed.to_owned();
            }
        }
        self.log.level = self.log.level.trim().to_owned();
        if self.log.level.is_empty() {
            self.log.level = String::from(DEFAULT_LOG_LEVEL);
        }
        Ok(())
    }
}
