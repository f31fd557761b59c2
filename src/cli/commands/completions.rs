//! `scrt completions`: generate shell completion scripts.
//!
//! Usage:
//!   scrt completions bash > ~/.local/share/bash-completion/completions/scrt
//!   scrt completions zsh > "${fpath[1]}/_scrt"
//!   scrt completions fish > ~/.config/fish/completions/scrt.fish

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "scrt", &mut io::stdout());
    Ok(())
}
