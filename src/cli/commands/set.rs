//! `scrt set`: associate a value with a key.

use std::io::{self, IsTerminal, Read};

use crate::backend::Registry;
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{Result, ScrtError};

/// Execute the `set` command.
pub fn execute(
    cli: &Cli,
    registry: &Registry,
    key: &str,
    value: Option<&str>,
    overwrite: bool,
) -> Result<()> {
    // Read the value before anything else so piped stdin is consumed
    // before a possible password prompt.
    let value = read_value(key, value)?;

    let session = Session::open(cli, registry)?;
    let mut store = session.load()?;

    if store.has(key) && !overwrite {
        return Err(ScrtError::KeyAlreadyExists(key.to_string()));
    }

    store.set(key, Some(value))?;
    session.save(&store)?;

    output::success(&format!("Value set for \"{key}\""));
    Ok(())
}

/// The value comes from, in order: the argument, piped stdin (raw
/// bytes, untouched), or an interactive hidden prompt.
fn read_value(key: &str, value: Option<&str>) -> Result<Vec<u8>> {
    if let Some(v) = value {
        output::warning("Value provided on command line, it may appear in shell history.");
        return Ok(v.as_bytes().to_vec());
    }

    if !io::stdin().is_terminal() {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let entered = dialoguer::Password::new()
        .with_prompt(format!("Enter value for {key}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| ScrtError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(entered.into_bytes())
}
