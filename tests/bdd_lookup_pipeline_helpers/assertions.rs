//! Then steps for lookup pipeline scenarios.

use cfapps::api::Report;
use cfapps::cf::AppRecord;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{CallCounts, FailureKind, LookupOutcome, LookupState};

fn outcome(lookup_state: &LookupState) -> StepResult<LookupOutcome> {
    lookup_state
        .outcome
        .get()
        .ok_or_else(|| String::from("lookup outcome should be set"))
}

fn report(lookup_state: &LookupState) -> StepResult<Report> {
    match outcome(lookup_state)? {
        LookupOutcome::Report(report) => Ok(report),
        LookupOutcome::Failed { kind, message } => Err(format!(
            "expected a report, got {kind:?} failure: {message}"
        )),
    }
}

fn failure(lookup_state: &LookupState) -> StepResult<(FailureKind, String)> {
    match outcome(lookup_state)? {
        LookupOutcome::Failed { kind, message } => Ok((kind, message)),
        LookupOutcome::Report(report) => Err(format!(
            "expected a failure, got report with apps {:?}",
            report.apps()
        )),
    }
}

fn calls(lookup_state: &LookupState) -> StepResult<CallCounts> {
    lookup_state
        .calls
        .get()
        .ok_or_else(|| String::from("call counts should be set"))
}

#[then("the report lists apps {apps}")]
fn report_lists_apps(lookup_state: &LookupState, apps: String) -> StepResult<()> {
    let expected: Vec<&str> = apps.split(',').map(str::trim).collect();
    let report = report(lookup_state)?;
    if report.apps() == expected.as_slice() {
        Ok(())
    } else {
        Err(format!(
            "expected apps {expected:?}, got {:?}",
            report.apps()
        ))
    }
}

#[then("the app records match the app names")]
fn app_records_match_names(lookup_state: &LookupState) -> StepResult<()> {
    let report = report(lookup_state)?;
    let record_names: Vec<Option<&str>> = report.apps_info().iter().map(AppRecord::name).collect();
    let app_names: Vec<Option<&str>> = report
        .apps()
        .iter()
        .map(|name| Some(name.as_str()))
        .collect();
    if record_names == app_names {
        Ok(())
    } else {
        Err(format!(
            "apps_info names {record_names:?} do not match apps {app_names:?}"
        ))
    }
}

#[then("the report is successful and unchanged")]
fn report_successful_unchanged(lookup_state: &LookupState) -> StepResult<()> {
    let report = report(lookup_state)?;
    if report.status() && !report.changed() {
        Ok(())
    } else {
        Err(format!(
            "expected status=true changed=false, got status={} changed={}",
            report.status(),
            report.changed()
        ))
    }
}

#[then("the report is empty")]
fn report_is_empty(lookup_state: &LookupState) -> StepResult<()> {
    let report = report(lookup_state)?;
    if report.apps().is_empty() && report.apps_info().is_empty() {
        Ok(())
    } else {
        Err(format!("expected no apps, got {:?}", report.apps()))
    }
}

#[then("the session was released once")]
fn session_released_once(lookup_state: &LookupState) -> StepResult<()> {
    let released = calls(lookup_state)?.sessions_released;
    if released == 1 {
        Ok(())
    } else {
        Err(format!("expected one session release, got {released}"))
    }
}

#[then("the session was not released")]
fn session_not_released(lookup_state: &LookupState) -> StepResult<()> {
    let released = calls(lookup_state)?.sessions_released;
    if released == 0 {
        Ok(())
    } else {
        Err(format!("expected no session release, got {released}"))
    }
}

#[then("the lookup fails with a not found error mentioning {text}")]
fn lookup_fails_not_found(lookup_state: &LookupState, text: String) -> StepResult<()> {
    match failure(lookup_state)? {
        (FailureKind::NotFound, message) if message.contains(&text) => Ok(()),
        (FailureKind::NotFound, message) => Err(format!(
            "expected message to mention '{text}', got: {message}"
        )),
        (kind, message) => Err(format!("expected NotFound, got {kind:?}: {message}")),
    }
}

#[then("the lookup fails with an authentication error")]
fn lookup_fails_authentication(lookup_state: &LookupState) -> StepResult<()> {
    match failure(lookup_state)? {
        (FailureKind::Authentication, _) => Ok(()),
        (kind, message) => Err(format!(
            "expected Authentication, got {kind:?}: {message}"
        )),
    }
}

#[then("no organization lookup was made")]
fn no_organization_lookup(lookup_state: &LookupState) -> StepResult<()> {
    let lookups = calls(lookup_state)?.org_lookups;
    if lookups == 0 {
        Ok(())
    } else {
        Err(format!("expected no organization lookups, got {lookups}"))
    }
}

#[then("no apps were fetched")]
fn no_apps_fetched(lookup_state: &LookupState) -> StepResult<()> {
    let fetches = calls(lookup_state)?.app_fetches;
    if fetches == 0 {
        Ok(())
    } else {
        Err(format!("expected no app fetches, got {fetches}"))
    }
}
