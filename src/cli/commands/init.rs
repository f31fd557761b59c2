//! `scrt init`: create a new, empty store.

use tracing::info;

use crate::backend::Registry;
use crate::cli::output;
use crate::cli::{load_settings, resolve_new_password, save_store, Cli};
use crate::errors::{Result, ScrtError};
use crate::store::Store;

/// Execute the `init` command.
pub fn execute(cli: &Cli, registry: &Registry, overwrite: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let backend = registry.open(&settings)?;

    if backend.exists()? {
        if !overwrite {
            output::tip("Use `scrt set` to add secrets to the existing store.");
            return Err(ScrtError::StoreAlreadyExists);
        }
        info!(location = %backend.location(), "overwriting existing store");
    }

    let password = resolve_new_password(&settings)?;
    save_store(backend.as_ref(), password.as_bytes(), &Store::new())?;

    output::success(&format!("Store initialized at {}", backend.location()));
    Ok(())
}
