use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{Result, ScrtError};

/// Store configuration, merged from a YAML file, environment variables
/// and command-line flags.
///
/// Every field is optional: nothing has an implicit default, so a store
/// is never opened in an unexpected place.
///
/// ```yaml
/// storage: local
/// password: p4ssw0rd
/// local:
///   path: ./store.scrt
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Master password used to derive the store key.
    pub password: Option<String>,

    /// Storage type name, looked up in the backend registry.
    pub storage: Option<String>,

    pub local: LocalSettings,
    pub s3: S3Settings,
    pub git: GitSettings,
}

/// Options of the `local` storage type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LocalSettings {
    pub path: Option<String>,
}

/// Options of the `s3` storage type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct S3Settings {
    pub bucket_name: Option<String>,
    pub key: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Options of the `git` storage type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitSettings {
    pub url: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
    pub checkout: Option<String>,
    pub message: Option<String>,
}

// ── Implementation ───────────────────────────────────────────────────

impl Settings {
    /// Name of the config file searched for in the working directory
    /// and its parents.
    pub const FILE_NAME: &'static str = ".scrt";

    /// Load settings from `explicit` if given, else from the nearest
    /// `.scrt` file at or above `start_dir`.
    ///
    /// No file found means empty settings; an explicit path that does
    /// not exist is an error.
    pub fn load(explicit: Option<&Path>, start_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.is_file() {
                    return Err(ScrtError::ConfigError(format!(
                        "{} does not exist or is not a file",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => Self::discover(start_dir)?,
        };

        match path {
            Some(p) => Self::load_file(&p),
            None => {
                debug!("no configuration file found");
                Ok(Self::default())
            }
        }
    }

    /// Walk up from `start_dir` to the filesystem root looking for `.scrt`.
    pub fn discover(start_dir: &Path) -> Result<Option<PathBuf>> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(Self::FILE_NAME);
            match std::fs::metadata(&candidate) {
                Ok(meta) if meta.is_dir() => {
                    return Err(ScrtError::ConfigError(format!(
                        "{} is a directory",
                        candidate.display()
                    )));
                }
                Ok(_) => return Ok(Some(candidate)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    /// Parse one YAML configuration file.
    pub fn load_file(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "reading configuration file");
        let contents = std::fs::read_to_string(path)?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(&contents).map_err(|e| {
            ScrtError::ConfigError(format!("could not read {}: {e}", path.display()))
        })
    }

    /// Merge `overrides` on top of `self`: every value set in
    /// `overrides` wins, unset values fall back to `self`.
    pub fn overlay(self, overrides: Settings) -> Settings {
        Settings {
            password: overrides.password.or(self.password),
            storage: overrides.storage.or(self.storage),
            local: LocalSettings {
                path: overrides.local.path.or(self.local.path),
            },
            s3: S3Settings {
                bucket_name: overrides.s3.bucket_name.or(self.s3.bucket_name),
                key: overrides.s3.key.or(self.s3.key),
                region: overrides.s3.region.or(self.s3.region),
                endpoint_url: overrides.s3.endpoint_url.or(self.s3.endpoint_url),
            },
            git: GitSettings {
                url: overrides.git.url.or(self.git.url),
                path: overrides.git.path.or(self.git.path),
                branch: overrides.git.branch.or(self.git.branch),
                checkout: overrides.git.checkout.or(self.git.checkout),
                message: overrides.git.message.or(self.git.message),
            },
        }
    }
}

// The password must never end up in logs or panic messages.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("storage", &self.storage)
            .field("local", &self.local)
            .field("s3", &self.s3)
            .field("git", &self.git)
            .finish()
    }
}

/// Return the trimmed option value, treating empty strings as unset.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ── Tests ────────────────────────────────────────────────────────────
