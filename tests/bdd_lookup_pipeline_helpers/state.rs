//! Scenario state for lookup pipeline behavioural tests.

use cfapps::api::Report;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Classification of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    Authentication,
    NotFound,
    Transport,
    Unexpected,
}

/// High-level outcome of a lookup.
#[derive(Debug, Clone)]
pub(crate) enum LookupOutcome {
    /// The pipeline produced a report.
    Report(Report),
    /// The pipeline failed.
    Failed { kind: FailureKind, message: String },
}

/// Calls observed on the fake foundation during one lookup.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CallCounts {
    pub(crate) org_lookups: usize,
    pub(crate) app_fetches: usize,
    pub(crate) sessions_released: usize,
}

#[derive(Default, ScenarioState)]
pub(crate) struct LookupState {
    /// Organization names known to the foundation. Duplicates model ambiguity.
    pub(crate) orgs: Slot<Vec<String>>,
    /// Space names inside every organization.
    pub(crate) spaces: Slot<Vec<String>>,
    /// App names inside every space, in fetch order.
    pub(crate) apps: Slot<Vec<String>>,
    pub(crate) rejects_credentials: Slot<bool>,
    pub(crate) outcome: Slot<LookupOutcome>,
    pub(crate) calls: Slot<CallCounts>,
}

#[fixture]
pub(crate) fn lookup_state() -> LookupState {
    let state = LookupState::default();
    state.orgs.set(Vec::new());
    state.spaces.set(Vec::new());
    state.apps.set(Vec::new());
    state.rejects_credentials.set(false);
    state
}
