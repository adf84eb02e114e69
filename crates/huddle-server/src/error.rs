// Rejections raised by route handlers and the JSON error replies they
// become.

use std::convert::Infallible;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use huddle_api::ApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// A single upstream call failed.
    #[error("Failed to fetch {what}")]
    Upstream { what: String, source: ApiError },

    #[error("Failed to build suggestions")]
    Suggestions(#[source] ApiError),
}

impl ServerError {
    pub fn upstream(what: impl Into<String>, source: ApiError) -> Self {
        ServerError::Upstream {
            what: what.into(),
            source,
        }
    }

    /// The upstream error message, for the `details` field.
    pub fn details(&self) -> String {
        match self {
            ServerError::Upstream { source, .. } | ServerError::Suggestions(source) => {
                source.to_string()
            }
        }
    }
}

impl warp::reject::Reject for ServerError {}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Turn any rejection into a JSON body with a matching status.
pub async fn recover(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if let Some(e) = err.find::<ServerError>() {
        warn!("{}: {}", e, e.details());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: e.to_string(),
                details: Some(e.details()),
            },
        )
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorBody {
                error: "Not found".into(),
                details: None,
            },
        )
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: "Invalid query".into(),
                details: Some(e.to_string()),
            },
        )
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        debug!("cors refused: {e}");
        (
            StatusCode::FORBIDDEN,
            ErrorBody {
                error: "CORS request forbidden".into(),
                details: Some(e.to_string()),
            },
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorBody {
                error: "Method not allowed".into(),
                details: None,
            },
        )
    } else {
        debug!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: "Unhandled rejection".into(),
                details: Some(format!("{err:?}")),
            },
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
