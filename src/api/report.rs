//! Output shapes printed by the `cf-apps` binary.

use serde::Serialize;

use crate::cf::AppRecord;
use crate::error::LookupError;

/// The result of a successful lookup.
///
/// Serialises as `{"changed", "status", "apps", "apps_info"}`. `apps[i]` is
/// always the `name` of `apps_info[i]`, and `changed` is always `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    changed: bool,
    status: bool,
    apps: Vec<String>,
    apps_info: Vec<AppRecord>,
}

impl Report {
    /// Builds a report from app records in fetch order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Unexpected`] naming the first record whose
    /// `name` is missing or not a string.
    pub fn from_records(apps_info: Vec<AppRecord>) -> Result<Self, LookupError> {
        let apps = apps_info
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .name()
                    .map(str::to_owned)
                    .ok_or_else(|| LookupError::Unexpected {
                        message: format!("app record {index} has no string 'name' field"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            changed: false,
            status: true,
            apps,
            apps_info,
        })
    }

    /// Always `false`: the lookup never modifies Cloud Foundry.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.changed
    }

    /// Always `true` for a report that was produced.
    #[must_use]
    pub const fn status(&self) -> bool {
        self.status
    }

    /// App names in fetch order.
    #[must_use]
    pub fn apps(&self) -> &[String] {
        &self.apps
    }

    /// Full app records in fetch order.
    #[must_use]
    pub fn apps_info(&self) -> &[AppRecord] {
        &self.apps_info
    }
}

/// The failure result printed in Ansible module mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    failed: bool,
    changed: bool,
    msg: String,
}

impl FailureReport {
    /// Builds a failure result carrying an error's message.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            failed: true,
            changed: false,
            msg: msg.into(),
        }
    }

    /// The human-readable failure message.
    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
