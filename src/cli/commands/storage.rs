//! `scrt storage`: list storage types and their options.

use crate::backend::Registry;
use crate::cli::output;
use crate::errors::Result;

/// Execute the `storage` command.
pub fn execute(registry: &Registry) -> Result<()> {
    output::print_storage_table(registry);
    output::tip("Select one with --storage <name> or `storage: <name>` in .scrt");
    Ok(())
}
