//! `local` storage: the blob is a single file on this machine.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{required, Backend, BackendFactory, StorageOption};
use crate::config::Settings;
use crate::errors::{Result, ScrtError};

const OPTIONS: &[StorageOption] = &[StorageOption {
    flag: "--local-path",
    description: "path to the store file",
    required: true,
}];

pub struct LocalFactory;

impl BackendFactory for LocalFactory {
    fn name(&self) -> &'static str {
        "local"
    }

    fn display_name(&self) -> &'static str {
        "Local"
    }

    fn description(&self) -> &'static str {
        "store secrets in a file on the local filesystem"
    }

    fn options(&self) -> &'static [StorageOption] {
        OPTIONS
    }

    fn build(&self, settings: &Settings) -> Result<Box<dyn Backend>> {
        let path = required(&settings.local.path, "local path (--local-path)")?;
        Ok(Box::new(LocalBackend::new(path)?))
    }
}

/// Store blob kept in one file.
#[derive(Debug)]
pub struct LocalBackend {
    path: PathBuf,
}

impl LocalBackend {
    /// Fails if `path` is a directory or cannot be inspected.  A path
    /// that does not exist yet is fine.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Err(ScrtError::Backend(format!(
                "{} is a directory",
                path.display()
            ))),
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self { path }),
            Err(e) => Err(ScrtError::Backend(format!(
                "invalid location {}: {e}",
                path.display()
            ))),
        }
    }
}

impl Backend for LocalBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.path.try_exists()?)
    }

    fn load(&self) -> Result<Vec<u8>> {
        debug!(path = %self.path.display(), "reading store file");
        Ok(fs::read(&self.path)?)
    }

    fn save(&self, data: &[u8]) -> Result<()> {
        debug!(path = %self.path.display(), bytes = data.len(), "writing store file");
        write_private_file(&self.path, data)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Atomically replace `path` with `data`, readable by the owner only.
///
/// Writes a fresh randomly named temp file (mode 0600) next to `path` and
/// renames it over the target, creating missing parent directories first.
pub(crate) fn write_private_file(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".scrt-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    // On failure the temp file is removed when the error drops it.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
