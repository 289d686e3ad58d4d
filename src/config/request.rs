//! Validated lookup parameters.

use url::Url;

use crate::cf::Credentials;
use crate::error::{ConfigError, Result};
use crate::secret::SecretString;

/// The five lookup parameters after validation.
///
/// Every field is present and non-blank, and `endpoint` is an absolute
/// `http` or `https` URL. `Debug` output redacts the password.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    /// The Cloud Foundry API endpoint.
    pub endpoint: Url,
    /// The account used to log in.
    pub username: String,
    /// The account password.
    pub password: SecretString,
    /// The organization name. Matching is case-sensitive.
    pub org: String,
    /// The space name. Matching is case-sensitive.
    pub space: String,
}

impl LookupRequest {
    /// Validates raw parameter values into a request.
    ///
    /// Blank values count as missing. All missing parameters are reported
    /// together, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` naming every missing parameter,
    /// or `ConfigError::InvalidValue` when `url` does not parse as an
    /// `http`/`https` URL.
    pub fn from_parts(
        url: Option<&str>,
        username: Option<&str>,
        password: Option<&SecretString>,
        org: Option<&str>,
        space: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        let url = present(url);
        let username = present(username);
        let password = password.filter(|secret| !secret.is_blank());
        let org = present(org);
        let space = present(space);

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push("url");
        }
        if username.is_none() {
            missing.push("username");
        }
        if password.is_none() {
            missing.push("password");
        }
        if org.is_none() {
            missing.push("org");
        }
        if space.is_none() {
            missing.push("space");
        }

        let (Some(url), Some(username), Some(password), Some(org), Some(space)) =
            (url, username, password, org, space)
        else {
            return Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into());
        };

        Ok(Self {
            endpoint: parse_endpoint(url)?,
            username: username.to_owned(),
            password: password.clone(),
            org: org.to_owned(),
            space: space.to_owned(),
        })
    }

    /// Returns the credentials used to open a session.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let endpoint = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        field: String::from("url"),
        reason: e.to_string(),
    })?;
    match endpoint.scheme() {
        "http" | "https" if endpoint.has_host() => Ok(endpoint),
        "http" | "https" => Err(ConfigError::InvalidValue {
            field: String::from("url"),
            reason: String::from("URL has no host"),
        }
        .into()),
        scheme => Err(ConfigError::InvalidValue {
            field: String::from("url"),
            reason: format!("unsupported scheme '{scheme}', expected http or https"),
        }
        .into()),
    }
}
