//! Error taxonomy for user administration calls.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http::{HttpError, Response};
use crate::users::types::FieldError;

/// Everything a user-administration operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsersError {
    /// Required fields were empty; nothing was sent.
    #[error("Fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// An update carried no changed fields; nothing was sent.
    #[error("Nothing to update")]
    NothingToUpdate,

    /// The server rejected individual fields.
    #[error("{message}")]
    FieldErrors {
        message: String,
        errors: Vec<FieldError>,
    },

    /// The server refused the request without per-field details.
    #[error("{message} (status {status})")]
    Server { status: u16, message: String },

    #[error("User {0} not found")]
    NotFound(u64),

    #[error("{0}")]
    InvalidCredentials(String),

    /// The bearer token was missing, expired or rejected.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// The request did not complete.
    #[error("Network error: {0}")]
    Network(String),

    /// The response was not JSON, or not the expected shape.
    #[error("Invalid server response: {0}")]
    MalformedResponse(String),
}

impl UsersError {
    /// Per-field server errors, if any.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::FieldErrors { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Local validation failures never reached the server.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::NothingToUpdate)
    }
}

impl From<HttpError> for UsersError {
    fn from(err: HttpError) -> Self {
        if err.is_connect {
            Self::Network(format!("Could not reach the server: {}", err.message))
        } else {
            Self::Network(err.message)
        }
    }
}

pub type UsersResult<T> = Result<T, UsersError>;

/// Error bodies as produced by the server: either the usual envelope with
/// `mensagem`, or a framework error with `detail`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    mensagem: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    dados: Option<serde_json::Value>,
}

/// Best-effort message from an error response body.
pub(crate) fn server_message(response: &Response) -> Option<String> {
    let body: ErrorBody = response.json().ok()?;
    body.mensagem
        .filter(|m| !m.trim().is_empty())
        .or_else(|| match body.detail {
            Some(serde_json::Value::String(detail)) => Some(detail),
            _ => None,
        })
}

/// Per-field errors carried in `dados` of an error envelope.
pub(crate) fn server_field_errors(response: &Response) -> Vec<FieldError> {
    response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.dados)
        .and_then(|dados| serde_json::from_value::<Vec<FieldError>>(dados).ok())
        .unwrap_or_default()
}

/// Map a non-2xx response to an error, preferring the server's own words.
pub(crate) fn status_error(response: &Response, default_message: &str) -> UsersError {
    let message = server_message(response).unwrap_or_else(|| default_message.to_owned());

    match response.status {
        401 | 403 => UsersError::Unauthorized(message),
        _ => {
            let errors = server_field_errors(response);
            if errors.is_empty() {
                UsersError::Server {
                    status: response.status,
                    message,
                }
            } else {
                UsersError::FieldErrors { message, errors }
            }
        }
    }
}

/// Decode a JSON body, refusing anything the server did not label as JSON.
pub(crate) fn parse_json<T: DeserializeOwned>(
    response: &Response,
    what: &str,
) -> UsersResult<T> {
    if !response.is_json() {
        let preview: String = response
            .text()
            .unwrap_or_default()
            .chars()
            .take(120)
            .collect();
        log::error!("{what}: response is not JSON: {preview}");
        return Err(UsersError::MalformedResponse(format!(
            "{what}: expected JSON, got {}",
            response.header("content-type").unwrap_or("no content type")
        )));
    }

    response
        .json()
        .map_err(|e| UsersError::MalformedResponse(format!("{what}: {e}")))
}
