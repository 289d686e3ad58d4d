//! Scenario state for configuration loading tests.

use cfapps::config::AppConfig;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// A configuration error flattened for assertions.
#[derive(Debug, Clone)]
pub(crate) enum ConfigFailure {
    /// A value was present but unusable.
    InvalidValue { field: String },
    /// One or more required parameters were absent.
    MissingRequired { fields: String },
    /// Any other error, by message.
    Other(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct ConfigState {
    /// Simulated `CFAPPS_*` environment, in insertion order.
    pub(crate) env: Slot<Vec<(String, String)>>,
    /// The `org` value written to the configuration file.
    pub(crate) file_org: Slot<String>,
    /// The `--space` flag.
    pub(crate) space_flag: Slot<String>,
    pub(crate) config: Slot<AppConfig>,
    pub(crate) load_failure: Slot<ConfigFailure>,
    pub(crate) validation_failure: Slot<ConfigFailure>,
}

#[fixture]
pub(crate) fn config_state() -> ConfigState {
    let state = ConfigState::default();
    state.env.set(Vec::new());
    state
}
