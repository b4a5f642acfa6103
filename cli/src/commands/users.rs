//! `uniways users ...` commands.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use inquire::{Confirm, Password, Select, Text};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::instrument;
use uniways_business::{
    AuthContext, Profile, SortColumn, SortState, User, UserDraft, UserFilter, UserListController,
    UserPatch, UsersResult,
};

use crate::cli::{ListArgs, UserFields};
use crate::context::CliContext;
use crate::output::Output;

/// Sort state after clicking the given headers in order.
pub fn sort_from_flags(columns: &[SortColumn]) -> SortState {
    columns
        .iter()
        .fold(SortState::default(), |sort, column| sort.toggle(*column))
}

pub fn filter_from_args(args: &ListArgs) -> UserFilter {
    UserFilter {
        id: args.id,
        nome: args.name.clone(),
        status: args.status.clone(),
    }
}

fn controller(ctx: &CliContext, auth: AuthContext) -> UserListController {
    UserListController::new(ctx.config().clone(), auth)
}

/// Print the success notification, if any, and hand back the result.
fn finish<T>(out: &Output, controller: &mut UserListController, result: UsersResult<T>) -> Result<T> {
    let note = controller.take_notification();
    let value = result?;
    if let Some(note) = note {
        out.notification(&note);
    }
    Ok(value)
}

// =========================================================================
// list
// =========================================================================

/// Fetch every user, then filter and sort the way the flags ask.
pub async fn list_view(
    ctx: &CliContext,
    auth: AuthContext,
    args: &ListArgs,
) -> Result<(Vec<User>, SortState)> {
    let mut controller = controller(ctx, auth);
    controller
        .load_all()
        .await
        .context("Failed to load users")?;

    let sort = sort_from_flags(&args.sort);
    let view = controller.view(&sort, &filter_from_args(args));
    Ok((view, sort))
}

#[instrument(skip_all, name = "users_list", fields(sort_flags = args.sort.len()))]
pub async fn run_list(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    let out = Output::new();
    let auth = ctx.ensure_authenticated().await?;

    let (users, sort) = list_view(ctx, auth, args).await?;
    if users.is_empty() {
        out.dim("No users found.");
        return Ok(());
    }

    out.newline();
    out.print(render_table(&users, &sort));
    out.total("Total", users.len());
    Ok(())
}

pub fn render_table(users: &[User], sort: &SortState) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        sort.header(SortColumn::Id),
        sort.header(SortColumn::Nome),
        sort.header(SortColumn::Login),
        "email".to_owned(),
        sort.header(SortColumn::Perfil),
        "status".to_owned(),
        "criado em".to_owned(),
    ]);

    for user in users {
        builder.push_record([
            user.id.to_string(),
            truncate_str(&user.nome, 32),
            user.login.clone(),
            user.email.clone().unwrap_or_default(),
            profile_label(&user.perfil),
            user.status.clone().unwrap_or_default(),
            user.data_criacao
                .as_deref()
                .map(format_created)
                .unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn profile_label(perfil: &str) -> String {
    Profile::parse(perfil).map_or_else(|| perfil.to_owned(), |p| p.label().to_owned())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// `dd/mm/yyyy hh:mm` for the timestamp shapes the API sends; anything else
/// is shown as received.
pub fn format_created(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    raw.to_owned()
}

// =========================================================================
// create
// =========================================================================

pub fn draft_from_fields(fields: UserFields, senha: String) -> UserDraft {
    UserDraft {
        nome: fields.nome.unwrap_or_default(),
        login: fields.login.unwrap_or_default(),
        senha,
        perfil: fields.perfil.unwrap_or_default(),
        email: fields.email,
    }
}

pub async fn create_user(ctx: &CliContext, auth: AuthContext, draft: &UserDraft) -> Result<User> {
    let out = Output::new();
    let mut controller = controller(ctx, auth);
    let result = controller.create(draft).await;
    finish(&out, &mut controller, result)
}

#[instrument(skip_all, name = "users_create")]
pub async fn run_create(ctx: &CliContext, fields: UserFields, interactive: bool) -> Result<()> {
    let out = Output::new();
    let auth = ctx.ensure_authenticated().await?;

    let draft = if interactive {
        prompt_draft(fields)?
    } else {
        warn_unknown_profile(&out, fields.perfil.as_deref());
        let senha = if std::io::stdin().is_terminal() {
            prompt_new_password()?
        } else {
            String::new()
        };
        draft_from_fields(fields, senha)
    };

    let user = create_user(ctx, auth, &draft).await?;
    out.labeled_indent("ID", user.id, 2);
    Ok(())
}

fn prompt_draft(defaults: UserFields) -> Result<UserDraft> {
    let nome = prompt_text("Name:", defaults.nome.as_deref())?;
    let login = prompt_text("Login:", defaults.login.as_deref())?;
    let senha = prompt_new_password()?;

    let start = defaults
        .perfil
        .as_deref()
        .and_then(Profile::parse)
        .and_then(|p| Profile::ALL.iter().position(|candidate| *candidate == p))
        .unwrap_or(0);
    let perfil = Select::new("Profile:", Profile::ALL.to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read profile")?;

    let email = Text::new("E-mail:")
        .with_initial_value(defaults.email.as_deref().unwrap_or_default())
        .with_help_message("Optional")
        .prompt_skippable()
        .context("Failed to read e-mail")?;

    Ok(UserDraft {
        nome,
        login,
        senha,
        perfil: perfil.as_str().to_owned(),
        email,
    })
}

fn prompt_text(label: &str, initial: Option<&str>) -> Result<String> {
    Text::new(label)
        .with_initial_value(initial.unwrap_or_default())
        .prompt()
        .with_context(|| format!("Failed to read {}", label.trim_end_matches(':')))
}

fn prompt_new_password() -> Result<String> {
    Password::new("Password:")
        .with_custom_confirmation_message("Confirm password:")
        .prompt()
        .context("Failed to read password")
}

fn warn_unknown_profile(out: &Output, perfil: Option<&str>) {
    let unknown = perfil.filter(|p| !p.trim().is_empty() && Profile::parse(p).is_none());
    if let Some(perfil) = unknown {
        out.warning(format!(
            "'{perfil}' is not a known profile; it will be sent as typed"
        ));
    }
}

// =========================================================================
// update
// =========================================================================

pub fn patch_from_fields(fields: UserFields, senha: Option<String>) -> UserPatch {
    UserPatch {
        nome: fields.nome,
        login: fields.login,
        senha,
        perfil: fields.perfil,
        email: fields.email,
    }
}

/// Send only the fields that differ from the server's current record.
pub async fn update_user(
    ctx: &CliContext,
    auth: AuthContext,
    id: u64,
    patch: UserPatch,
) -> Result<User> {
    let out = Output::new();
    let mut controller = controller(ctx, auth);
    controller
        .load_all()
        .await
        .context("Failed to load users")?;
    drop(controller.take_notification());

    let result = controller.update_changed(id, patch).await;
    finish(&out, &mut controller, result)
}

#[instrument(skip_all, name = "users_update", fields(id = id))]
pub async fn run_update(ctx: &CliContext, id: u64, fields: UserFields, senha: bool) -> Result<()> {
    let out = Output::new();
    let auth = ctx.ensure_authenticated().await?;

    warn_unknown_profile(&out, fields.perfil.as_deref());
    let senha = if senha {
        Some(prompt_new_password()?)
    } else {
        None
    };

    let user = update_user(ctx, auth, id, patch_from_fields(fields, senha)).await?;
    out.labeled_indent("Name", &user.nome, 2);
    out.labeled_indent("Profile", profile_label(&user.perfil), 2);
    Ok(())
}

// =========================================================================
// delete
// =========================================================================

pub async fn delete_user(ctx: &CliContext, auth: AuthContext, id: u64) -> Result<()> {
    let out = Output::new();
    let mut controller = controller(ctx, auth);
    let result = controller.remove(id).await;
    finish(&out, &mut controller, result)
}

#[instrument(skip_all, name = "users_delete", fields(id = id))]
pub async fn run_delete(ctx: &CliContext, id: u64, yes: bool) -> Result<()> {
    let out = Output::new();
    let auth = ctx.ensure_authenticated().await?;

    if !yes {
        if !std::io::stdin().is_terminal() {
            bail!("Refusing to delete user {id} without confirmation; pass --yes");
        }
        let confirmed = Confirm::new(&format!("Delete user {id}?"))
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !confirmed {
            out.dim("Cancelled.");
            return Ok(());
        }
    }

    delete_user(ctx, auth, id).await
}
