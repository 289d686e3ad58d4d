//! Given/when steps for lookup pipeline scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cfapps::api::run_with_client;
use cfapps::cf::{
    AppRecord, BoxFuture, CloudFoundryClient, Credentials, OrgGuid, Session, SpaceGuid,
};
use cfapps::config::LookupRequest;
use cfapps::error::{LookupError, Resource};
use cfapps::secret::SecretString;
use mockall::mock;
use rstest_bdd_macros::{given, when};
use serde_json::json;

use super::StepResult;
use super::state::{CallCounts, FailureKind, LookupOutcome, LookupState};

mock! {
    Foundation {}

    impl CloudFoundryClient for Foundation {
        fn authenticate(&self, credentials: &Credentials) -> BoxFuture<'_, Result<Session, LookupError>>;
        fn resolve_org(&self, session: &Session, name: &str) -> BoxFuture<'_, Result<OrgGuid, LookupError>>;
        fn resolve_space(&self, session: &Session, org: &OrgGuid, name: &str) -> BoxFuture<'_, Result<SpaceGuid, LookupError>>;
        fn fetch_apps(&self, session: &Session, org: &OrgGuid, space: &SpaceGuid) -> BoxFuture<'_, Result<Vec<AppRecord>, LookupError>>;
        fn end_session(&self, session: Session) -> BoxFuture<'_, ()>;
    }
}

/// Shared counters updated from inside mock expectations.
#[derive(Default)]
struct Counters {
    org_lookups: AtomicUsize,
    app_fetches: AtomicUsize,
    sessions_released: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> CallCounts {
        CallCounts {
            org_lookups: self.org_lookups.load(Ordering::SeqCst),
            app_fetches: self.app_fetches.load(Ordering::SeqCst),
            sessions_released: self.sessions_released.load(Ordering::SeqCst),
        }
    }
}

#[expect(
    clippy::expect_used,
    reason = "the scenario endpoint is a literal; a parse failure is a test bug"
)]
fn fake_session() -> Session {
    Session::new(
        url::Url::parse("https://api.sys.example.com").expect("endpoint should parse"),
        String::from("bearer"),
        SecretString::from("scenario-token"),
    )
}

/// Resolve a name against a list the way the backend filter would.
fn resolve_name(
    known: &[String],
    resource: Resource,
    name: &str,
) -> Result<String, LookupError> {
    let matches = known.iter().filter(|candidate| *candidate == name).count();
    if matches == 1 {
        Ok(format!("{resource}-{name}-guid"))
    } else {
        Err(LookupError::NotFound {
            resource,
            name: name.to_owned(),
            matches,
        })
    }
}

fn app_records(names: &[String]) -> Vec<AppRecord> {
    names
        .iter()
        .filter_map(|name| {
            json!({ "name": name, "state": "STARTED", "instances": 1 })
                .as_object()
                .cloned()
                .map(AppRecord::new)
        })
        .collect()
}

fn build_foundation(state: &LookupState, counters: &Arc<Counters>) -> MockFoundation {
    let orgs = state.orgs.get().unwrap_or_default();
    let spaces = state.spaces.get().unwrap_or_default();
    let apps = state.apps.get().unwrap_or_default();
    let rejects = state.rejects_credentials.get().unwrap_or(false);

    let mut client = MockFoundation::new();
    client.expect_authenticate().returning(move |_| {
        Box::pin(async move {
            if rejects {
                Err(LookupError::Authentication {
                    message: String::from("Bad credentials"),
                })
            } else {
                Ok(fake_session())
            }
        })
    });

    let org_counter = Arc::clone(counters);
    client.expect_resolve_org().returning(move |_, name| {
        org_counter.org_lookups.fetch_add(1, Ordering::SeqCst);
        let result = resolve_name(&orgs, Resource::Organization, name).map(OrgGuid::new);
        Box::pin(async move { result })
    });

    client.expect_resolve_space().returning(move |_, _, name| {
        let result = resolve_name(&spaces, Resource::Space, name).map(SpaceGuid::new);
        Box::pin(async move { result })
    });

    let app_counter = Arc::clone(counters);
    client.expect_fetch_apps().returning(move |_, _, _| {
        app_counter.app_fetches.fetch_add(1, Ordering::SeqCst);
        let records = app_records(&apps);
        Box::pin(async move { Ok(records) })
    });

    let release_counter = Arc::clone(counters);
    client.expect_end_session().returning(move |_| {
        release_counter
            .sessions_released
            .fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    });

    client
}

fn push_name(slot: &rstest_bdd::Slot<Vec<String>>, name: String) {
    let mut names = slot.get().unwrap_or_default();
    names.push(name);
    slot.set(names);
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

const fn classify(error: &LookupError) -> FailureKind {
    match error {
        LookupError::Authentication { .. } => FailureKind::Authentication,
        LookupError::NotFound { .. } => FailureKind::NotFound,
        LookupError::Transport { .. } => FailureKind::Transport,
        LookupError::Unexpected { .. } => FailureKind::Unexpected,
    }
}

#[given("a foundation with organization {org}")]
fn given_organization(lookup_state: &LookupState, org: String) {
    push_name(&lookup_state.orgs, org);
}

#[given("the organization contains space {space}")]
fn given_space(lookup_state: &LookupState, space: String) {
    push_name(&lookup_state.spaces, space);
}

#[given("the space contains apps {apps}")]
fn given_apps(lookup_state: &LookupState, apps: String) {
    lookup_state.apps.set(split_list(&apps));
}

#[given("the space contains no apps")]
fn given_no_apps(lookup_state: &LookupState) {
    lookup_state.apps.set(Vec::new());
}

#[given("the foundation rejects the credentials")]
fn given_rejected_credentials(lookup_state: &LookupState) {
    lookup_state.rejects_credentials.set(true);
}

#[when("apps are looked up for org {org} and space {space}")]
fn when_apps_looked_up(lookup_state: &LookupState, org: String, space: String) -> StepResult<()> {
    let request = LookupRequest::from_parts(
        Some("https://api.sys.example.com"),
        Some("deployer"),
        Some(&SecretString::from("hunter2")),
        Some(&org),
        Some(&space),
    )
    .map_err(|e| format!("request should validate: {e}"))?;

    let counters = Arc::new(Counters::default());
    let client = build_foundation(lookup_state, &counters);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to create runtime: {e}"))?;
    let outcome = match runtime.block_on(run_with_client(&client, &request)) {
        Ok(report) => LookupOutcome::Report(report),
        Err(error) => LookupOutcome::Failed {
            kind: classify(&error),
            message: error.to_string(),
        },
    };

    lookup_state.outcome.set(outcome);
    lookup_state.calls.set(counters.snapshot());
    Ok(())
}
