//! Command implementations for the UniWays CLI.
//!
//! Each subcommand is implemented in its own module for better organization.

pub mod completions;
pub mod login;
pub mod profiles;
pub mod users;

pub use completions::write_completions;
pub use login::{run_login, run_logout, run_status};
pub use profiles::print_profiles;
pub use users::{run_create, run_delete, run_list, run_update};
