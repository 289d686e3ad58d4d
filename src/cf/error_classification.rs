//! Error classification helpers for Cloud Foundry HTTP failures.
//!
//! This module converts low-level `reqwest` errors and unsuccessful HTTP
//! responses into semantic `LookupError` variants so callers receive
//! actionable diagnostics. Request URLs are reduced to their path before they
//! reach a message; query strings and credentials never do.

use reqwest::StatusCode;

use super::models::{ApiErrorResponse, TokenErrorResponse};
use crate::error::LookupError;

/// Describe a `reqwest` failure without echoing the full request URL.
///
/// The error's source chain is appended so connection failures keep their
/// root cause (for example `Connection refused`).
fn describe_request_error(error: reqwest::Error) -> String {
    let cause = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_decode() {
        "response body could not be decoded"
    } else if error.is_body() {
        "request or response body failed"
    } else {
        "request failed"
    };
    let path = error
        .url()
        .map(|url| url.path().to_owned())
        .unwrap_or_default();

    let stripped = error.without_url();
    let mut detail = stripped.to_string();
    let mut source = std::error::Error::source(&stripped);
    while let Some(inner) = source {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        source = inner.source();
    }

    if path.is_empty() {
        format!("{cause}: {detail}")
    } else {
        format!("{cause} for {path}: {detail}")
    }
}

/// Classify a `reqwest` error raised while talking to the API.
pub(super) fn classify_transport_error(error: reqwest::Error) -> LookupError {
    LookupError::Transport {
        message: describe_request_error(error),
    }
}

/// Classify a `reqwest` error raised during login.
///
/// Any failure before a token is issued, including an unreachable endpoint,
/// counts as an authentication failure.
pub(super) fn classify_login_error(error: reqwest::Error) -> LookupError {
    LookupError::Authentication {
        message: describe_request_error(error),
    }
}

/// Classify an unsuccessful response from the UAA token endpoint.
///
/// `400`, `401`, and `403` mean the credentials were rejected. Other statuses
/// are reported as transport failures of the token endpoint.
pub(super) fn classify_token_status(status: StatusCode, body: &str) -> LookupError {
    let detail = serde_json::from_str::<TokenErrorResponse>(body)
        .map(TokenErrorResponse::into_message)
        .unwrap_or_else(|_| status_text(status));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LookupError::Authentication { message: detail }
        }
        _ => LookupError::Transport {
            message: format!("token endpoint returned {}: {detail}", status_text(status)),
        },
    }
}

/// Classify an unsuccessful response from a Cloud Foundry API call.
pub(super) fn classify_api_status(status: StatusCode, path: &str, body: &str) -> LookupError {
    let detail = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(ApiErrorResponse::into_message);

    let message = match detail {
        Some(description) => {
            format!("GET {path} returned {}: {description}", status_text(status))
        }
        None => format!("GET {path} returned {}", status_text(status)),
    };
    LookupError::Transport { message }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
