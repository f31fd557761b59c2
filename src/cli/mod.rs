//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use zeroize::Zeroizing;

use crate::backend::{Backend, Registry};
use crate::config::{GitSettings, LocalSettings, S3Settings, Settings};
use crate::errors::{Result, ScrtError};
use crate::store::{read_store, write_store, Store};

/// scrt: a secret manager for the command line.
#[derive(Parser)]
#[command(
    name = "scrt",
    about = "A secret manager for the command line",
    long_about = "A secret manager for the command line.\n\n\
        Secrets are stored in an encrypted key-value store, kept on the local \
        filesystem, in an S3 bucket or in a git repository. Every option can \
        also be set in a .scrt YAML file or with an SCRT_* environment variable.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: nearest .scrt in this or a parent directory)
    #[arg(short, long, global = true, env = "SCRT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Master password used to encrypt the store
    #[arg(short, long, global = true, env = "SCRT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Storage type (see `scrt storage`)
    #[arg(long, global = true, env = "SCRT_STORAGE")]
    pub storage: Option<String>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub local: LocalArgs,

    #[command(flatten)]
    pub s3: S3Args,

    #[command(flatten)]
    pub git: GitArgs,
}

/// Options of the `local` storage type.
#[derive(clap::Args, Debug, Default)]
#[command(next_help_heading = "Local storage")]
pub struct LocalArgs {
    /// Path to the store file
    #[arg(id = "local_path", value_name = "PATH", long = "local-path", global = true, env = "SCRT_LOCAL_PATH")]
    pub path: Option<String>,
}

/// Options of the `s3` storage type.
#[derive(clap::Args, Debug, Default)]
#[command(next_help_heading = "S3 storage")]
pub struct S3Args {
    /// Name of the S3 bucket
    #[arg(long = "s3-bucket-name", global = true, env = "SCRT_S3_BUCKET_NAME")]
    pub bucket_name: Option<String>,

    /// Path of the store object in the bucket
    #[arg(id = "s3_key", value_name = "KEY", long = "s3-key", global = true, env = "SCRT_S3_KEY")]
    pub key: Option<String>,

    /// Region of the S3 bucket
    #[arg(long = "s3-region", global = true, env = "SCRT_S3_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long = "s3-endpoint-url", global = true, env = "SCRT_S3_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

/// Options of the `git` storage type.
#[derive(clap::Args, Debug, Default)]
#[command(next_help_heading = "Git storage")]
pub struct GitArgs {
    /// URL of the git repository
    #[arg(long = "git-url", global = true, env = "SCRT_GIT_URL")]
    pub url: Option<String>,

    /// Path of the store file in the repository
    #[arg(id = "git_path", value_name = "PATH", long = "git-path", global = true, env = "SCRT_GIT_PATH")]
    pub path: Option<String>,

    /// Branch to clone and push to
    #[arg(long = "git-branch", global = true, env = "SCRT_GIT_BRANCH")]
    pub branch: Option<String>,

    /// Revision to check out (read-only)
    #[arg(long = "git-checkout", global = true, env = "SCRT_GIT_CHECKOUT")]
    pub checkout: Option<String>,

    /// Commit message for updates
    #[arg(long = "git-message", global = true, env = "SCRT_GIT_MESSAGE")]
    pub message: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty store
    Init {
        /// Replace an existing store (all its secrets are lost)
        #[arg(long)]
        overwrite: bool,
    },

    /// Associate a value with a key
    Set {
        /// Key name
        key: String,
        /// Value (omit to read from stdin or an interactive prompt)
        value: Option<String>,
        /// Replace an existing value
        #[arg(long)]
        overwrite: bool,
    },

    /// Print the value associated with a key
    Get {
        /// Key name
        key: String,
    },

    /// List all keys in the store
    List,

    /// Remove the value associated with a key
    Unset {
        /// Key name
        key: String,
    },

    /// Write all secrets in a plaintext format
    Export {
        /// Output format
        #[arg(short, long, value_enum)]
        format: commands::export::ExportFormat,

        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available storage types and their options
    Storage,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show version
    Version,
}

impl Cli {
    /// Settings given on the command line or through `SCRT_*` variables.
    pub fn overrides(&self) -> Settings {
        Settings {
            password: self.password.clone(),
            storage: self.storage.clone(),
            local: LocalSettings {
                path: self.local.path.clone(),
            },
            s3: S3Settings {
                bucket_name: self.s3.bucket_name.clone(),
                key: self.s3.key.clone(),
                region: self.s3.region.clone(),
                endpoint_url: self.s3.endpoint_url.clone(),
            },
            git: GitSettings {
                url: self.git.url.clone(),
                path: self.git.path.clone(),
                branch: self.git.branch.clone(),
                checkout: self.git.checkout.clone(),
                message: self.git.message.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Effective settings: the config file, overridden by flags and env vars.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let file = Settings::load(cli.config.as_deref(), &cwd)?;
    Ok(file.overlay(cli.overrides()))
}

/// Get the store password, trying in order:
/// 1. `--password`, `SCRT_PASSWORD` or the config file
/// 2. Interactive prompt, if stdin is a terminal
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn resolve_password(settings: &Settings) -> Result<Zeroizing<String>> {
    if let Some(pw) = &settings.password {
        return Ok(Zeroizing::new(pw.clone()));
    }
    if !std::io::stdin().is_terminal() {
        return Err(ScrtError::MissingOption("password (--password)".into()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter store password")
        .interact()
        .map_err(|e| ScrtError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Like `resolve_password`, but an interactive prompt asks twice.
/// Used when creating a store.
pub fn resolve_new_password(settings: &Settings) -> Result<Zeroizing<String>> {
    if settings.password.is_some() || !std::io::stdin().is_terminal() {
        return resolve_password(settings);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose store password")
        .with_confirmation(
            "Confirm store password",
            "Passwords do not match, try again",
        )
        .interact()
        .map_err(|e| ScrtError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Read and decrypt the store, failing if it was never initialized.
pub fn load_store(backend: &dyn Backend, password: &[u8]) -> Result<Store> {
    info!("checking if store exists");
    if !backend.exists()? {
        return Err(ScrtError::StoreNotFound(backend.location()));
    }

    info!("reading store from storage");
    let blob = backend.load()?;
    read_store(password, &blob)
}

/// Encrypt the store and write it back to storage.
pub fn save_store(backend: &dyn Backend, password: &[u8], store: &Store) -> Result<()> {
    let blob = write_store(password, store)?;
    info!("writing store to storage");
    backend.save(&blob)
}

/// Settings, password and store for commands that read or modify secrets.
pub struct Session {
    pub settings: Settings,
    pub backend: Box<dyn Backend>,
    password: Zeroizing<String>,
}

impl Session {
    /// Resolve settings and password, then open the configured backend.
    pub fn open(cli: &Cli, registry: &Registry) -> Result<Self> {
        let settings = load_settings(cli)?;
        let backend = registry.open(&settings)?;
        let password = resolve_password(&settings)?;
        Ok(Self {
            settings,
            backend,
            password,
        })
    }

    pub fn load(&self) -> Result<Store> {
        load_store(self.backend.as_ref(), self.password.as_bytes())
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        save_store(self.backend.as_ref(), self.password.as_bytes(), store)
    }
}
