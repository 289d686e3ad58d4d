//! Lenient deserialisation of string parameters.
//!
//! Ansible declares every lookup parameter as `type='str'` and coerces YAML
//! scalars such as `987654321` or `yes` to strings before they reach a module.
//! These helpers accept the same scalars and convert them, so a numeric
//! password is used rather than rejected. A rejected value is never echoed:
//! only its kind appears in the error.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};

/// What the visitors tell serde they expect.
const EXPECTING: &str = "a string, number, or boolean";

/// Visits a scalar and renders it as a string.
pub(crate) struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(EXPECTING)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.to_owned())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_bytes<E: de::Error>(self, _value: &[u8]) -> Result<Self::Value, E> {
        Err(E::invalid_type(Unexpected::Other("byte array"), &self))
    }
}

/// Deserialises a scalar into a `String`.
pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(ScalarVisitor)
}

/// Deserialises an optional scalar into an `Option<String>`.
pub(crate) fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    struct OptionalScalar;

    impl<'de> Visitor<'de> for OptionalScalar {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str(EXPECTING)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            string(deserializer).map(Some)
        }
    }

    deserializer.deserialize_option(OptionalScalar)
}
