//! `uniways completions <shell>`.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the `uniways` completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut impl Write) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), "uniways", out);
    out.flush()?;
    Ok(())
}
