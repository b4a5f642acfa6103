//! Login, logout and session status.

use anyhow::{Context as _, Result};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{info, instrument};
use uniways_business::{AuthContext, SessionUser, login};

use crate::context::CliContext;
use crate::output::Output;

/// Prompt for the login name (unless given) and the password.
pub fn prompt_credentials(login: Option<String>) -> Result<(String, String)> {
    let login = match login {
        Some(login) => login,
        None => Text::new("Login:")
            .with_help_message("Enter your UniWays login")
            .prompt()
            .context("Failed to read login")?,
    };

    let senha = Password::new("Password:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read password")?;

    Ok((login, senha))
}

/// Sign in and persist the token.
pub async fn login_and_save(ctx: &CliContext, login_name: &str, senha: &str) -> Result<AuthContext> {
    let auth = login(ctx.config(), login_name, senha)
        .await
        .context("Login failed")?;

    if let Some(token) = auth.token() {
        ctx.tokens().save(login_name.trim(), token)?;
    }
    info!("Signed in as {login_name}");
    Ok(auth)
}

#[instrument(skip_all, name = "login")]
pub async fn run_login(ctx: &CliContext, login: Option<String>) -> Result<()> {
    let out = Output::new();

    out.header("Login to UniWays");
    out.newline();

    let (login, senha) = prompt_credentials(login)?;
    login_and_save(ctx, &login, &senha).await?;

    out.newline();
    out.success(format!("Successfully logged in as {}", login.trim()));
    out.dim(format!("  Token saved to {}", ctx.tokens().path().display()));
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &CliContext) -> Result<()> {
    let out = Output::new();
    let login = ctx.tokens().load().ok().flatten().map(|s| s.login);

    if ctx.tokens().clear()? {
        out.success(format!(
            "Signed out '{}'",
            login.as_deref().unwrap_or("unknown")
        ));
    } else {
        out.info("Not currently signed in.");
    }
    Ok(())
}

/// The signed-in user, if the saved session is still valid.
pub async fn check_status(ctx: &CliContext) -> Result<Option<SessionUser>> {
    Ok(ctx.restore_session().await?.map(|(_, user)| user))
}

#[instrument(skip_all, name = "status")]
pub async fn run_status(ctx: &CliContext) -> Result<()> {
    let out = Output::new();

    if ctx.tokens().load()?.is_none() {
        out.info("Not signed in.");
        out.dim("  Use 'uniways login' to sign in.");
        return Ok(());
    }

    match check_status(ctx).await? {
        Some(user) => {
            out.success(format!("Signed in as '{}'", user.sub));
            if let Some(expires) = user.exp.and_then(|exp| chrono::DateTime::from_timestamp(exp, 0)) {
                out.labeled_indent("Expires", expires.format("%Y-%m-%d %H:%M UTC"), 2);
            }
            out.labeled_indent("Token file", ctx.tokens().path().display(), 2);
        }
        None => {
            out.error("Session is invalid or expired; the saved token was removed.");
            out.dim("  Use 'uniways login' to sign in again.");
        }
    }
    Ok(())
}
