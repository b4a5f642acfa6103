//! Per-invocation context: API configuration plus the saved session.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use tracing::{info, instrument, warn};
use uniways_business::{AuthContext, BusinessConfig, SessionCheck, SessionUser, validate_session};

use crate::commands::login::{login_and_save, prompt_credentials};
use crate::token::TokenStore;

pub struct CliContext {
    config: BusinessConfig,
    tokens: TokenStore,
}

impl CliContext {
    pub fn new(config: BusinessConfig, tokens: TokenStore) -> Self {
        Self { config, tokens }
    }

    /// Configuration from `UNIWAYS_*` variables, with `--api-url` taking
    /// precedence, and the token store in the home directory.
    pub fn from_env(api_url: Option<&str>) -> Result<Self> {
        let mut vars: Vec<(String, String)> = std::env::vars().collect();
        if let Some(url) = api_url {
            vars.retain(|(key, _)| key != "UNIWAYS_API_URL");
            vars.push(("UNIWAYS_API_URL".to_owned(), url.to_owned()));
        }

        let config = BusinessConfig::from_vars(vars).context("Invalid configuration")?;
        Ok(Self::new(config, TokenStore::default_location()?))
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Check the saved token with the server.
    ///
    /// A token the server no longer accepts is deleted from disk.
    #[instrument(skip_all, name = "restore_session")]
    pub async fn restore_session(&self) -> Result<Option<(AuthContext, SessionUser)>> {
        let Some(saved) = self.tokens.load()? else {
            return Ok(None);
        };

        match validate_session(&self.config, saved.auth()).await {
            SessionCheck::Valid { ctx, user } => {
                info!("Restored session for {}", user.sub);
                Ok(Some((ctx, user)))
            }
            SessionCheck::Expired { reason, .. } => {
                warn!("Saved session for {} is no longer valid: {reason}", saved.login);
                self.tokens.clear()?;
                Ok(None)
            }
        }
    }

    /// Restore the saved session or, on a terminal, prompt for a login.
    pub async fn ensure_authenticated(&self) -> Result<AuthContext> {
        if let Some((ctx, _)) = self.restore_session().await? {
            return Ok(ctx);
        }

        eprintln!("⚠ Session expired or not logged in. Please login to continue.\n");

        if !std::io::stdin().is_terminal() {
            bail!("Cannot prompt for login: stdin is not a terminal. Run 'uniways login' first.");
        }

        let (login, senha) = prompt_credentials(None)?;
        login_and_save(self, &login, &senha).await
    }
}
