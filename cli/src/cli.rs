use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use uniways_business::SortColumn;

#[derive(Parser)]
#[command(name = "uniways")]
#[command(about = "Admin panel for UniWays users", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the UniWays API
    #[arg(long, global = true, env = "UNIWAYS_API_URL")]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and save the session token
    Login {
        /// Login name (prompted when omitted)
        #[arg(long, short = 'l')]
        login: Option<String>,
    },
    /// Forget the saved session token
    Logout,
    /// Check whether the saved session is still accepted
    Status,
    /// Manage users
    #[command(subcommand)]
    Users(UsersCommand),
    /// List the known profiles
    Profiles,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users
    List(ListArgs),
    /// Create a user (the password is always prompted)
    Create {
        #[command(flatten)]
        fields: UserFields,

        /// Interactive mode (prompt for every field)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Update the given fields of a user
    Update {
        /// User ID
        id: u64,

        #[command(flatten)]
        fields: UserFields,

        /// Prompt for a new password
        #[arg(long)]
        senha: bool,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Sort by column (id, nome, login, perfil); repeat to flip direction
    #[arg(long, short = 's', value_parser = parse_sort_column)]
    pub sort: Vec<SortColumn>,

    /// Only the user with this ID
    #[arg(long)]
    pub id: Option<u64>,

    /// Name contains this text (case-insensitive)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Exact status, e.g. ativo
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UserFields {
    /// Full name
    #[arg(long)]
    pub nome: Option<String>,

    /// Login name
    #[arg(long)]
    pub login: Option<String>,

    /// Profile tag (admin, usuario, financeiro)
    #[arg(long)]
    pub perfil: Option<String>,

    /// E-mail address
    #[arg(long)]
    pub email: Option<String>,
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    SortColumn::parse(value).ok_or_else(|| {
        let known: Vec<&str> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown column `{value}`, expected one of: {}", known.join(", "))
    })
}
