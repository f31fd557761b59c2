//! `scrt unset`: remove the value associated with a key.

use crate::backend::Registry;
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::Result;

/// Execute the `unset` command.  Unsetting a missing key is not an error.
pub fn execute(cli: &Cli, registry: &Registry, key: &str) -> Result<()> {
    let session = Session::open(cli, registry)?;
    let mut store = session.load()?;

    let existed = store.has(key);
    store.unset(key);
    session.save(&store)?;

    if existed {
        output::success(&format!("Value unset for \"{key}\""));
    } else {
        output::info(&format!("No value for \"{key}\""));
    }
    Ok(())
}
