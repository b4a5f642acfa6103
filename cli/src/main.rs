#![allow(clippy::exit)]

use anyhow::Result;
use clap::Parser as _;
use uniways_business::UsersError;
use uniways_cli::cli::{Cli, Commands, UsersCommand};
use uniways_cli::commands;
use uniways_cli::context::CliContext;
use uniways_cli::output::Output;
use uniways_cli::timing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with timing support
    timing::init_tracing(cli.verbose, cli.timing);

    if let Err(err) = run(cli).await {
        report(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        return commands::write_completions(shell, &mut std::io::stdout().lock());
    }

    let ctx = CliContext::from_env(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { login } => commands::run_login(&ctx, login).await,
        Commands::Logout => commands::run_logout(&ctx),
        Commands::Status => commands::run_status(&ctx).await,
        Commands::Users(UsersCommand::List(args)) => commands::run_list(&ctx, &args).await,
        Commands::Users(UsersCommand::Create {
            fields,
            interactive,
        }) => commands::run_create(&ctx, fields, interactive).await,
        Commands::Users(UsersCommand::Update { id, fields, senha }) => {
            commands::run_update(&ctx, id, fields, senha).await
        }
        Commands::Users(UsersCommand::Delete { id, yes }) => {
            commands::run_delete(&ctx, id, yes).await
        }
        Commands::Profiles => {
            commands::print_profiles();
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn report(err: &anyhow::Error) {
    let out = Output::new();
    match err.downcast_ref::<UsersError>() {
        Some(users_err) if users_err.is_local() => out.warning(format!("{err:#}")),
        _ => out.error(format!("{err:#}")),
    }

    if let Some(users_err) = err.downcast_ref::<UsersError>() {
        for field in users_err.field_errors() {
            out.dim(format!("  - {field}"));
        }
    }
}
