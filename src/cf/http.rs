//! `reqwest`-backed Cloud Foundry client.
//!
//! Login follows the UAA password grant used by the `cf` CLI: the token issuer
//! is discovered from `GET /v2/info`, then `POST <token_endpoint>/oauth/token`
//! exchanges the username and password for a bearer token. Lookups use the
//! v2 collection endpoints with `q=` filters and follow `next_url` until the
//! collection is exhausted.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use super::error_classification::{
    classify_api_status, classify_login_error, classify_token_status, classify_transport_error,
};
use super::models::{InfoResponse, Page, Resource, TokenResponse};
use super::{
    AppRecord, BoxFuture, CloudFoundryClient, Credentials, OrgGuid, Session, SpaceGuid,
};
use crate::config::HttpConfig;
use crate::error::{LookupError, Resource as ResourceKind};
use crate::secret::SecretString;

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content-Type requested from every endpoint.
const JSON_CONTENT_TYPE: &str = "application/json";

/// OAuth client used by the `cf` CLI. It has an empty secret.
const CF_OAUTH_CLIENT: &str = "cf";

/// Page size requested from collection endpoints.
const RESULTS_PER_PAGE: &str = "100";

/// Upper bound on pages followed for a single collection.
const MAX_PAGES: usize = 1000;

/// Production implementation of [`CloudFoundryClient`] using `reqwest`.
pub struct HttpCloudFoundryClient {
    client: reqwest::Client,
}

impl HttpCloudFoundryClient {
    /// Creates a client configured from [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Unexpected`] if the HTTP client cannot be built
    /// (for example, due to TLS initialisation failure).
    pub fn new(config: &HttpConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cfapps/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .build()
            .map_err(|error| LookupError::Unexpected {
                message: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, LookupError> {
        let Credentials {
            endpoint,
            username,
            password,
        } = credentials;

        let info_url = join_endpoint(&endpoint, "/v2/info")?;
        let response = self
            .client
            .get(info_url)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(classify_login_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Authentication {
                message: format!("GET /v2/info returned {status}"),
            });
        }
        let info: InfoResponse = response.json().await.map_err(classify_login_error)?;
        let token_url = token_url(&info.token_endpoint)?;
        tracing::debug!(token_endpoint = %info.token_endpoint, "requesting access token");

        let form = serde_urlencoded::to_string([
            ("grant_type", "password"),
            ("username", username.as_str()),
            ("password", password.expose_secret()),
        ])
        .map_err(|error| LookupError::Unexpected {
            message: format!("failed to encode token request: {error}"),
        })?;

        let response = self
            .client
            .post(token_url)
            .basic_auth(CF_OAUTH_CLIENT, Some(""))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(form)
            .send()
            .await
            .map_err(classify_login_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response, "/oauth/token").await;
            return Err(classify_token_status(status, &body));
        }
        let token: TokenResponse = response.json().await.map_err(classify_login_error)?;

        Ok(Session::new(
            endpoint,
            token.token_type,
            SecretString::new(token.access_token),
        ))
    }

    async fn get_page(&self, session: &Session, url: Url) -> Result<Page, LookupError> {
        let path = url.path().to_owned();
        tracing::debug!(%path, "GET");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, session.authorization_header())
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(classify_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response, &path).await;
            return Err(classify_api_status(status, &path, &body));
        }
        response.json().await.map_err(classify_transport_error)
    }

    /// Fetch every resource of a collection, following `next_url`.
    async fn get_all(&self, session: &Session, first: Url) -> Result<Vec<Resource>, LookupError> {
        let mut resources = Vec::new();
        let mut next = Some(first);
        let mut pages = 0_usize;
        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                return Err(LookupError::Transport {
                    message: format!("collection did not end after {MAX_PAGES} pages"),
                });
            }
            pages += 1;
            let page = self.get_page(session, url).await?;
            resources.extend(page.resources);
            next = page
                .next_url
                .map(|href| join_endpoint(session.endpoint(), &href))
                .transpose()?;
        }
        Ok(resources)
    }

    /// Resolve a name to exactly one GUID.
    async fn resolve_single(
        &self,
        session: &Session,
        url: Url,
        resource: ResourceKind,
        name: String,
    ) -> Result<String, LookupError> {
        let matches = self.get_all(session, url).await?;
        if let [only] = matches.as_slice() {
            return Ok(only.metadata.guid.clone());
        }
        Err(LookupError::NotFound {
            resource,
            name,
            matches: matches.len(),
        })
    }
}

impl CloudFoundryClient for HttpCloudFoundryClient {
    fn authenticate(&self, credentials: &Credentials) -> BoxFuture<'_, Result<Session, LookupError>> {
        let owned = credentials.clone();
        Box::pin(self.login(owned))
    }

    fn resolve_org(
        &self,
        session: &Session,
        name: &str,
    ) -> BoxFuture<'_, Result<OrgGuid, LookupError>> {
        let owned_session = session.clone();
        let org_name = name.to_owned();
        Box::pin(async move {
            let url = collection_url(
                owned_session.endpoint(),
                "/v2/organizations",
                &[format!("name:{org_name}")],
            )?;
            self.resolve_single(&owned_session, url, ResourceKind::Organization, org_name)
                .await
                .map(OrgGuid::new)
        })
    }

    fn resolve_space(
        &self,
        session: &Session,
        org: &OrgGuid,
        name: &str,
    ) -> BoxFuture<'_, Result<SpaceGuid, LookupError>> {
        let owned_session = session.clone();
        let path = format!("/v2/organizations/{org}/spaces");
        let space_name = name.to_owned();
        Box::pin(async move {
            let url = collection_url(
                owned_session.endpoint(),
                &path,
                &[format!("name:{space_name}")],
            )?;
            self.resolve_single(&owned_session, url, ResourceKind::Space, space_name)
                .await
                .map(SpaceGuid::new)
        })
    }

    fn fetch_apps(
        &self,
        session: &Session,
        org: &OrgGuid,
        space: &SpaceGuid,
    ) -> BoxFuture<'_, Result<Vec<AppRecord>, LookupError>> {
        let owned_session = session.clone();
        let filters = [
            format!("organization_guid:{org}"),
            format!("space_guid:{space}"),
        ];
        Box::pin(async move {
            let url = collection_url(owned_session.endpoint(), "/v2/apps", &filters)?;
            let resources = self.get_all(&owned_session, url).await?;
            Ok(resources
                .into_iter()
                .map(Resource::into_app_record)
                .collect())
        })
    }

    fn end_session(&self, session: Session) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            tracing::debug!(endpoint = %session.endpoint(), "releasing session");
            drop(session);
        })
    }
}

/// Read the body of an unsuccessful response for its error description.
///
/// A body that cannot be read yields an empty string; the status alone is
/// then reported.
async fn read_error_body(response: reqwest::Response, path: &str) -> String {
    response.text().await.unwrap_or_else(|error| {
        tracing::debug!(%path, error = %error.without_url(), "failed to read error response body");
        String::new()
    })
}

/// Resolve a path (optionally with a query) beneath the API endpoint.
///
/// Paths are API-root relative, so a leading `/` does not discard a path
/// prefix on the endpoint: `https://gw.example.com/cf` joined with
/// `/v2/info` is `https://gw.example.com/cf/v2/info`.
fn join_endpoint(endpoint: &Url, path: &str) -> Result<Url, LookupError> {
    let mut base = endpoint.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|error| LookupError::Unexpected {
            message: format!("cannot build request URL for {path}: {error}"),
        })
}

/// Build a collection URL with one `q` parameter per filter.
fn collection_url(endpoint: &Url, path: &str, filters: &[String]) -> Result<Url, LookupError> {
    let mut url = join_endpoint(endpoint, path)?;
    {
        let mut query = url.query_pairs_mut();
        for filter in filters {
            query.append_pair("q", filter);
        }
        query.append_pair("results-per-page", RESULTS_PER_PAGE);
    }
    Ok(url)
}

/// Build the UAA token URL from the advertised token endpoint.
fn token_url(token_endpoint: &str) -> Result<Url, LookupError> {
    let raw = format!("{}/oauth/token", token_endpoint.trim_end_matches('/'));
    Url::parse(&raw).map_err(|error| LookupError::Authentication {
        message: format!("advertised token endpoint '{token_endpoint}' is invalid: {error}"),
    })
}
