//! `/usuarios` API client helpers.
//!
//! Each function performs exactly one request against the configured base URL
//! and attaches the bearer token from the given [`AuthContext`]. None of them
//! retries. Callers (normally [`UserListController`](super::UserListController))
//! decide what happens to local state.

use crate::BusinessConfig;
use crate::auth::AuthContext;
use crate::error::{UsersError, UsersResult, parse_json, status_error};
use crate::http::{Client, RequestBuilder};

use super::types::{ApiEnvelope, FieldError, User, UserDraft, UserPatch};

fn users_url(config: &BusinessConfig) -> String {
    format!("{}/usuarios/", config.api_base_url())
}

fn user_url(config: &BusinessConfig, id: u64) -> String {
    format!("{}/usuarios/{id}", config.api_base_url())
}

fn prepare(request: RequestBuilder, config: &BusinessConfig, auth: &AuthContext) -> RequestBuilder {
    request.auth(auth).timeout(config.request_timeout())
}

fn serialize_error(err: &serde_json::Error) -> UsersError {
    UsersError::MalformedResponse(format!("Failed to serialize request: {err}"))
}

/// GET `/usuarios/`
pub async fn list_users(config: &BusinessConfig, auth: &AuthContext) -> UsersResult<Vec<User>> {
    let response = prepare(Client::get(users_url(config)), config, auth)
        .send()
        .await?;

    if !response.is_success() {
        return Err(status_error(&response, "Failed to fetch users"));
    }

    // `dados` must be a list; anything else is a malformed response rather than "no users".
    let envelope: ApiEnvelope<serde_json::Value> = parse_json(&response, "list users")?;
    match envelope.dados {
        Some(serde_json::Value::Array(items)) => {
            serde_json::from_value(serde_json::Value::Array(items)).map_err(|e| {
                UsersError::MalformedResponse(format!("list users: invalid user record: {e}"))
            })
        }
        None => Err(UsersError::MalformedResponse(
            "list users: response has no user list".to_owned(),
        )),
        Some(other) => Err(UsersError::MalformedResponse(format!(
            "list users: expected a list of users, got {}",
            json_kind(&other)
        ))),
    }
}

/// POST `/usuarios/`
///
/// The draft is sent as-is; required-field checks belong to the caller.
pub async fn create_user(
    config: &BusinessConfig,
    auth: &AuthContext,
    draft: &UserDraft,
) -> UsersResult<(User, Option<String>)> {
    let response = prepare(Client::post(users_url(config)), config, auth)
        .json(draft)
        .map_err(|e| serialize_error(&e))?
        .send()
        .await?;

    if !response.is_success() {
        return Err(status_error(&response, "Failed to create user"));
    }

    // Some servers answer 200 with `status: "error"` and the field list in `dados`.
    let envelope: ApiEnvelope<serde_json::Value> = parse_json(&response, "create user")?;
    let envelope = reject_error_envelope(envelope, response.status, "Failed to create user")?;
    let user = decode_user(envelope.dados, "create user")?;
    Ok((user, envelope.mensagem))
}

/// PUT `/usuarios/{id}`
///
/// Sends only the fields set on `patch`.
pub async fn update_user(
    config: &BusinessConfig,
    auth: &AuthContext,
    id: u64,
    patch: &UserPatch,
) -> UsersResult<(User, Option<String>)> {
    let response = prepare(Client::put(user_url(config, id)), config, auth)
        .json(patch)
        .map_err(|e| serialize_error(&e))?
        .send()
        .await?;

    if response.status == 404 {
        return Err(UsersError::NotFound(id));
    }
    if !response.is_success() {
        return Err(status_error(&response, "Failed to update user"));
    }

    let envelope: ApiEnvelope<serde_json::Value> = parse_json(&response, "update user")?;
    let envelope = reject_error_envelope(envelope, response.status, "Failed to update user")?;
    let user = decode_user(envelope.dados, "update user")?;
    if user.id != id {
        return Err(UsersError::MalformedResponse(format!(
            "update user: asked for {id}, server returned {}",
            user.id
        )));
    }
    Ok((user, envelope.mensagem))
}

/// DELETE `/usuarios/{id}`
///
/// Returns the server's message, if any.
pub async fn delete_user(
    config: &BusinessConfig,
    auth: &AuthContext,
    id: u64,
) -> UsersResult<Option<String>> {
    let response = prepare(Client::delete(user_url(config, id)), config, auth)
        .send()
        .await?;

    if response.status == 404 {
        return Err(UsersError::NotFound(id));
    }
    if !response.is_success() {
        return Err(status_error(&response, "Failed to delete user"));
    }

    // 204 and empty bodies are fine here.
    if response.body.is_empty() {
        return Ok(None);
    }
    let envelope: ApiEnvelope<serde_json::Value> = parse_json(&response, "delete user")?;
    let envelope = reject_error_envelope(envelope, response.status, "Failed to delete user")?;
    Ok(envelope.mensagem)
}

/// A 2xx reply can still carry `status: "error"`; treat it like an error status.
fn reject_error_envelope(
    envelope: ApiEnvelope<serde_json::Value>,
    status: u16,
    default_message: &str,
) -> UsersResult<ApiEnvelope<serde_json::Value>> {
    if envelope.status != "error" {
        return Ok(envelope);
    }

    let message = envelope
        .mensagem
        .unwrap_or_else(|| default_message.to_owned());
    let errors: Vec<FieldError> = envelope
        .dados
        .and_then(|d| serde_json::from_value(d).ok())
        .unwrap_or_default();

    Err(if errors.is_empty() {
        UsersError::Server { status, message }
    } else {
        UsersError::FieldErrors { message, errors }
    })
}

fn decode_user(dados: Option<serde_json::Value>, what: &str) -> UsersResult<User> {
    match dados {
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| UsersError::MalformedResponse(format!("{what}: invalid user record: {e}"))),
        Some(other) => Err(UsersError::MalformedResponse(format!(
            "{what}: expected a user object, got {}",
            json_kind(&other)
        ))),
        None => Err(UsersError::MalformedResponse(format!(
            "{what}: response has no user"
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
