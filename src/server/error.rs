use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error as ThisError;
use tracing::{debug, error};

pub type AppResult<T> = Result<T, Error>;

// the client only ever sees a status code and { "error": message }, the variants are for us
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    /// kept apart from Upstream so the moviebox token can be thrown away on a 401
    #[error("{0}")]
    UpstreamUnauthorized(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Upstream(_)
            | Error::UpstreamUnauthorized(_)
            | Error::AnyhowError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_param(name: &str) -> Self {
        Error::BadRequest(format!("Missing required query parameter: {}", name))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("request failed with {}: {}", status, self);
        } else {
            debug!("request rejected with {}: {}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        // first message is enough for the ui, it only shows one line anyway
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("Validation error: {}", errors));

        Error::BadRequest(message)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Upstream(format!("upstream timed out: {}", err))
        } else {
            Error::Upstream(err.to_string())
        }
    }
}
