//! Redacting wrapper for credential material.
//!
//! [`SecretString`] is the marker for sensitive configuration fields. Its
//! `Debug`, `Display`, and `Serialize` implementations never emit the wrapped
//! value, so any struct that holds one can be logged or traced without leaking
//! the password it carries. The value is only reachable through
//! [`SecretString::expose_secret`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder rendered in place of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A string whose contents must never appear in logs or output.
///
/// Unlike a bare `String`, this type does not implement `Deref`, `AsRef`, or
/// `PartialEq`, so the value cannot leak through implicit conversions or
/// assertion failure messages.
#[derive(Clone, Default)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Wraps a sensitive value.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Returns the wrapped value.
    ///
    /// Callers must not log, print, or embed the result in error messages.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Returns whether the wrapped value is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Accepts a string or any other scalar, rendered as a string.
///
/// A value of any other type is rejected by kind only; it never appears in
/// the error message.
impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::scalar::string(deserializer).map(Self::new)
    }
}
