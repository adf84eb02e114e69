// Shared reqwest plumbing for every upstream client.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ApiError::ClientBuild)
}

/// Join a base URL and a path that starts with '/'.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Send `request` and read the body as JSON. Non-2xx statuses are errors.
pub(crate) async fn get_json(request: reqwest::RequestBuilder, url: &str) -> Result<Value> {
    debug!(url, "GET");
    let response = request.send().await.map_err(|source| ApiError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(|source| ApiError::Http {
        url: url.to_string(),
        source,
    })?;
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
