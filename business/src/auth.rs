//! Session authentication as an explicit value.
//!
//! An [`AuthContext`] carries the bearer token obtained from
//! `POST /usuarios/login`. It is passed to every API call instead of being read
//! from shared storage; logging in or out produces a new context.

use serde::{Deserialize, Serialize};

use crate::BusinessConfig;
use crate::error::{UsersError, UsersResult};
use crate::http::Client;
use crate::users::types::ApiEnvelope;

const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Authentication state attached to outgoing requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthContext {
    /// A context with no token. Requests go out without `Authorization`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop the token.
    #[must_use]
    pub fn logout(self) -> Self {
        Self::anonymous()
    }
}

/// Body of `POST /usuarios/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub senha: String,
}

/// `dados` of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Claims returned by `GET /usuarios/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    /// Subject of the token (the user's login).
    pub sub: String,
    /// Expiry as a unix timestamp in seconds.
    #[serde(default)]
    pub exp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    usuario: SessionUser,
}

/// Outcome of [`validate_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// The token is accepted by the server.
    Valid { ctx: AuthContext, user: SessionUser },
    /// The token is missing, rejected or could not be checked. The caller
    /// should discard it; the returned context is already anonymous.
    Expired { ctx: AuthContext, reason: String },
}

impl SessionCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn into_context(self) -> AuthContext {
        match self {
            Self::Valid { ctx, .. } | Self::Expired { ctx, .. } => ctx,
        }
    }
}

/// `POST /usuarios/login`.
///
/// On success returns a fresh context holding the access token. Any rejection
/// from the server becomes [`UsersError::InvalidCredentials`].
pub async fn login(config: &BusinessConfig, login: &str, senha: &str) -> UsersResult<AuthContext> {
    if login.trim().is_empty() || senha.is_empty() {
        let mut missing = Vec::new();
        if login.trim().is_empty() {
            missing.push("login");
        }
        if senha.is_empty() {
            missing.push("senha");
        }
        return Err(UsersError::MissingFields(missing));
    }

    let url = format!("{}/usuarios/login", config.api_base_url());
    let body = LoginRequest {
        login: login.to_owned(),
        senha: senha.to_owned(),
    };

    log::info!("Signing in as '{login}'");

    let response = Client::post(&url)
        .timeout(config.request_timeout())
        .json(&body)
        .map_err(|e| UsersError::MalformedResponse(format!("Failed to serialize request: {e}")))?
        .send()
        .await?;

    if !response.is_success() {
        let message = crate::error::server_message(&response)
            .unwrap_or_else(|| INVALID_CREDENTIALS.to_owned());
        log::warn!("Login rejected for '{login}' ({}): {message}", response.status);
        return Err(UsersError::InvalidCredentials(message));
    }

    let envelope: ApiEnvelope<LoginData> = crate::error::parse_json(&response, "login")?;
    match envelope.dados {
        Some(data) if envelope.status != "error" => {
            log::info!("Signed in as '{login}'");
            Ok(AuthContext::with_token(data.access_token))
        }
        _ => Err(UsersError::InvalidCredentials(
            envelope
                .mensagem
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_owned()),
        )),
    }
}

/// `GET /usuarios/me`.
///
/// Never fails: every problem maps to [`SessionCheck::Expired`] with an
/// anonymous context, mirroring a logout on validation failure.
pub async fn validate_session(config: &BusinessConfig, ctx: AuthContext) -> SessionCheck {
    if !ctx.is_authenticated() {
        return SessionCheck::Expired {
            ctx: ctx.logout(),
            reason: "Not signed in".to_owned(),
        };
    }

    let url = format!("{}/usuarios/me", config.api_base_url());
    let result = Client::get(&url)
        .auth(&ctx)
        .timeout(config.request_timeout())
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            log::warn!("Session check failed: {err}");
            return SessionCheck::Expired {
                ctx: ctx.logout(),
                reason: err.to_string(),
            };
        }
    };

    if !response.is_success() {
        let reason = crate::error::server_message(&response)
            .unwrap_or_else(|| format!("Session rejected with status {}", response.status));
        return SessionCheck::Expired {
            ctx: ctx.logout(),
            reason,
        };
    }

    match response.json::<MeResponse>() {
        Ok(me) => SessionCheck::Valid { ctx, user: me.usuario },
        Err(e) => SessionCheck::Expired {
            ctx: ctx.logout(),
            reason: format!("Failed to parse session response: {e}"),
        },
    }
}
