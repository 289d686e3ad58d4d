//! The lookup pipeline.
//!
//! [`run_with_client`] is the async core: it authenticates, resolves the
//! organization and the space by name, fetches the space's application records,
//! and projects their names into a [`Report`]. Each step depends on the
//! previous one and none is retried; the first error aborts the lookup.
//!
//! [`run`] is the synchronous entry point used by the binary. It builds the
//! production [`HttpCloudFoundryClient`] and drives the pipeline on a
//! current-thread Tokio runtime.
//!
//! These functions do not print to stdout/stderr or call
//! `std::process::exit`.

mod report;

pub use report::{FailureReport, Report};

use crate::cf::{AppRecord, CloudFoundryClient, HttpCloudFoundryClient, Session};
use crate::config::{HttpConfig, LookupRequest};
use crate::error::LookupError;

/// Look up the applications in a space using the production HTTP client.
///
/// # Errors
///
/// Returns [`LookupError::Unexpected`] if the HTTP client or the runtime
/// cannot be built, and any error from [`run_with_client`].
pub fn run(request: &LookupRequest, http: &HttpConfig) -> Result<Report, LookupError> {
    let client = HttpCloudFoundryClient::new(http)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| LookupError::Unexpected {
            message: format!("failed to start async runtime: {error}"),
        })?;
    runtime.block_on(run_with_client(&client, request))
}

/// Look up the applications in a space through any Cloud Foundry client.
///
/// After a successful login the session is released exactly once, whether
/// the rest of the lookup succeeds or fails.
///
/// # Errors
///
/// - [`LookupError::Authentication`] if login fails. No further call is made.
/// - [`LookupError::NotFound`] if the organization or the space does not
///   resolve to exactly one identifier.
/// - [`LookupError::Transport`] if the backend fails mid-lookup.
/// - [`LookupError::Unexpected`] if an app record has no `name`.
pub async fn run_with_client<C>(client: &C, request: &LookupRequest) -> Result<Report, LookupError>
where
    C: CloudFoundryClient + ?Sized,
{
    tracing::debug!(
        endpoint = %request.endpoint,
        username = %request.username,
        "logging in to Cloud Foundry"
    );
    let session = client.authenticate(&request.credentials()).await?;

    let outcome = fetch_space_apps(client, &session, request).await;
    client.end_session(session).await;

    let report = Report::from_records(outcome?)?;
    tracing::info!(
        org = %request.org,
        space = %request.space,
        count = report.apps().len(),
        "found applications"
    );
    Ok(report)
}

async fn fetch_space_apps<C>(
    client: &C,
    session: &Session,
    request: &LookupRequest,
) -> Result<Vec<AppRecord>, LookupError>
where
    C: CloudFoundryClient + ?Sized,
{
    let org = client.resolve_org(session, &request.org).await?;
    tracing::debug!(org = %request.org, org_guid = %org, "resolved organization");

    let space = client.resolve_space(session, &org, &request.space).await?;
    tracing::debug!(space = %request.space, space_guid = %space, "resolved space");

    let apps = client.fetch_apps(session, &org, &space).await?;
    tracing::debug!(count = apps.len(), "fetched app records");
    Ok(apps)
}
