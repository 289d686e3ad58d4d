//! Cloud Foundry client abstraction.
//!
//! The lookup pipeline talks to Cloud Foundry exclusively through the
//! [`CloudFoundryClient`] trait. Production code uses
//! [`HttpCloudFoundryClient`], which speaks the v2 REST API and obtains
//! bearer tokens from the UAA password grant; tests inject `mockall` doubles.
//!
//! Resolution policy lives in the backend: the client asks for resources
//! filtered by name and accepts the answer only when exactly one resource
//! comes back.

mod error_classification;
mod http;
mod models;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::LookupError;
use crate::secret::SecretString;

pub use http::HttpCloudFoundryClient;

/// A boxed future for async trait methods.
///
/// This type alias enables `mockall::automock` compatibility and trait object
/// usage for async methods in [`CloudFoundryClient`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Connection credentials for one lookup.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The Cloud Foundry API endpoint.
    pub endpoint: Url,
    /// The account identifier.
    pub username: String,
    /// The account password.
    pub password: SecretString,
}

/// An authenticated handle used by every call after login.
///
/// The bearer token is held as a [`SecretString`], so a `Session` can be
/// traced without exposing it.
#[derive(Debug, Clone)]
pub struct Session {
    endpoint: Url,
    token_type: String,
    access_token: SecretString,
}

impl Session {
    /// Creates a session bound to an API endpoint from a token response.
    #[must_use]
    pub const fn new(endpoint: Url, token_type: String, access_token: SecretString) -> Self {
        Self {
            endpoint,
            token_type,
            access_token,
        }
    }

    /// Returns the API endpoint this session was opened against.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the value of the `Authorization` header for API calls.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose_secret())
    }
}

/// The unique identifier of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgGuid(String);

/// The unique identifier of a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceGuid(String);

macro_rules! guid_impls {
    ($ty:ident) => {
        impl $ty {
            /// Wraps a backend-assigned GUID.
            #[must_use]
            pub fn new(guid: impl Into<String>) -> Self {
                Self(guid.into())
            }

            /// Returns the GUID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

guid_impls!(OrgGuid);
guid_impls!(SpaceGuid);

/// Backend-defined metadata describing one application.
///
/// The schema is owned by the Cloud Foundry API; only `name` is interpreted
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppRecord(Map<String, Value>);

impl AppRecord {
    /// Wraps an application's attribute map.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the application's name, if the record carries a string `name`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Returns the value of an arbitrary attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the underlying attribute map.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for AppRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Trait for the Cloud Foundry operations the lookup pipeline consumes.
///
/// Returned futures borrow only `self`; implementations copy whatever they
/// need from the other arguments before suspending.
#[cfg_attr(test, mockall::automock)]
pub trait CloudFoundryClient: Send + Sync {
    /// Opens a session with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Authentication`] when the credentials are
    /// rejected or the endpoint cannot be reached.
    fn authenticate(&self, credentials: &Credentials) -> BoxFuture<'_, Result<Session, LookupError>>;

    /// Resolves an organization name to its GUID.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] unless exactly one organization
    /// matches, or [`LookupError::Transport`] if the request fails.
    fn resolve_org(&self, session: &Session, name: &str)
    -> BoxFuture<'_, Result<OrgGuid, LookupError>>;

    /// Resolves a space name within an organization to its GUID.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] unless exactly one space matches, or
    /// [`LookupError::Transport`] if the request fails.
    fn resolve_space(
        &self,
        session: &Session,
        org: &OrgGuid,
        name: &str,
    ) -> BoxFuture<'_, Result<SpaceGuid, LookupError>>;

    /// Fetches every application record in a space, in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Transport`] if any page cannot be fetched.
    fn fetch_apps(
        &self,
        session: &Session,
        org: &OrgGuid,
        space: &SpaceGuid,
    ) -> BoxFuture<'_, Result<Vec<AppRecord>, LookupError>>;

    /// Releases a session. Best effort; never fails.
    fn end_session(&self, session: Session) -> BoxFuture<'_, ()>;
}
