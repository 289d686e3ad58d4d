//! Wire types for the Cloud Foundry v2 API and the UAA token endpoint.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::AppRecord;

/// Subset of `GET /v2/info` needed to locate the token issuer.
#[derive(Debug, Deserialize)]
pub(super) struct InfoResponse {
    pub(super) token_endpoint: String,
}

/// Successful UAA token response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: String,
    #[serde(default = "default_token_type")]
    pub(super) token_type: String,
}

fn default_token_type() -> String {
    String::from("bearer")
}

/// UAA error response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenErrorResponse {
    pub(super) error: String,
    #[serde(default)]
    pub(super) error_description: Option<String>,
}

impl TokenErrorResponse {
    pub(super) fn into_message(self) -> String {
        self.error_description.unwrap_or(self.error)
    }
}

/// Cloud Foundry v2 error body.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorResponse {
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) error_code: Option<String>,
}

impl ApiErrorResponse {
    pub(super) fn into_message(self) -> Option<String> {
        match (self.error_code, self.description) {
            (Some(code), Some(description)) => Some(format!("{code}: {description}")),
            (None, Some(description)) => Some(description),
            (Some(code), None) => Some(code),
            (None, None) => None,
        }
    }
}

/// One page of a v2 collection.
#[derive(Debug, Deserialize)]
pub(super) struct Page {
    #[serde(default)]
    pub(super) next_url: Option<String>,
    #[serde(default)]
    pub(super) resources: Vec<Resource>,
}

/// A v2 resource: `metadata` plus an arbitrary `entity`.
#[derive(Debug, Deserialize)]
pub(super) struct Resource {
    pub(super) metadata: Metadata,
    #[serde(default)]
    pub(super) entity: Map<String, Value>,
}

/// The metadata block shared by every v2 resource.
#[derive(Debug, Deserialize)]
pub(super) struct Metadata {
    pub(super) guid: String,
}

impl Resource {
    /// Converts an app resource into an [`AppRecord`].
    ///
    /// The record is the entity, with the resource GUID added under `guid`
    /// unless the entity already defines that key.
    pub(super) fn into_app_record(self) -> AppRecord {
        let Self { metadata, mut entity } = self;
        entity
            .entry("guid")
            .or_insert_with(|| Value::String(metadata.guid));
        AppRecord::new(entity)
    }
}
