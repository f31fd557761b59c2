//! `scrt list`: print every key, one per line.

use crate::backend::Registry;
use crate::cli::{Cli, Session};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, registry: &Registry) -> Result<()> {
    let session = Session::open(cli, registry)?;
    let store = session.load()?;

    for key in store.list() {
        println!("{key}");
    }
    Ok(())
}
