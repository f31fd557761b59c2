//! `scrt get`: print the value associated with a key.

use std::io::{self, IsTerminal, Write};

use crate::backend::Registry;
use crate::cli::{Cli, Session};
use crate::errors::Result;

/// Execute the `get` command.
///
/// The value is written as raw bytes; a trailing newline is added only
/// when stdout is a terminal so piped output stays byte-exact.
pub fn execute(cli: &Cli, registry: &Registry, key: &str) -> Result<()> {
    let session = Session::open(cli, registry)?;
    let store = session.load()?;
    let value = store.get(key)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(value)?;
    if stdout.is_terminal() {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
