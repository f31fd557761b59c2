//! `scrt export`: write every secret in a plaintext format.
//!
//! Supported formats:
//! - `dotenv`: `.env` file format (KEY=value, one per line)
//! - `json`: JSON object { "KEY": "value", ... }
//! - `yaml`: YAML mapping KEY: value
//!
//! Values must be valid UTF-8 to be exported.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use zeroize::Zeroizing;

use crate::backend::local::write_private_file;
use crate::backend::Registry;
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::config::settings::non_empty;
use crate::config::Settings;
use crate::errors::{Result, ScrtError};
use crate::store::Store;

/// Plaintext export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Dotenv,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dotenv => "dotenv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// Execute the `export` command.
pub fn execute(
    cli: &Cli,
    registry: &Registry,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let session = Session::open(cli, registry)?;

    if let Some(dest) = output_path {
        if is_store_file(&session.settings, dest) {
            return Err(ScrtError::CommandFailed(
                "refusing to export over the store file".into(),
            ));
        }
    }

    let store = session.load()?;
    let content = render(&store, format)?;

    match output_path {
        Some(dest) => {
            write_private_file(dest, content.as_bytes()).map_err(|e| {
                ScrtError::CommandFailed(format!("failed to write export file: {e}"))
            })?;
            output::success(&format!(
                "Exported {} secrets to {} (format: {format})",
                store.len(),
                dest.display()
            ));
        }
        // Raw output only, no status message.
        None => print!("{}", content.as_str()),
    }

    Ok(())
}

/// Render the whole store in `format`.
pub fn render(store: &Store, format: ExportFormat) -> Result<Zeroizing<String>> {
    let secrets = utf8_values(store)?;
    let content = match format {
        ExportFormat::Dotenv => format_as_env(&secrets),
        ExportFormat::Json => format_as_json(&secrets)?,
        ExportFormat::Yaml => format_as_yaml(&secrets)?,
    };
    Ok(Zeroizing::new(content))
}

fn utf8_values(store: &Store) -> Result<BTreeMap<&str, &str>> {
    store
        .iter()
        .map(|(key, value)| {
            std::str::from_utf8(value).map(|v| (key, v)).map_err(|_| {
                ScrtError::SerializationError(format!(
                    "value for \"{key}\" is not valid UTF-8 and cannot be exported"
                ))
            })
        })
        .collect()
}

/// Whether `dest` points at the configured local store file.
fn is_store_file(settings: &Settings, dest: &Path) -> bool {
    if non_empty(&settings.storage) != Some("local") {
        return false;
    }
    let Some(store_path) = non_empty(&settings.local.path) else {
        return false;
    };
    let store_path = Path::new(store_path);

    match (store_path.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => store_path == dest,
    }
}

/// Format secrets as `.env` file content.
///
/// Every value is double-quoted so no loader splits, trims or expands it.
fn format_as_env(secrets: &BTreeMap<&str, &str>) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    for (key, value) in secrets {
        let _ = writeln!(out, "{key}=\"{}\"", escape_env_value(value));
    }
    out
}

fn escape_env_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' | '"' | '$' | '!' | '`' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_as_json(secrets: &BTreeMap<&str, &str>) -> Result<String> {
    let mut out = serde_json::to_string_pretty(secrets)
        .map_err(|e| ScrtError::SerializationError(format!("JSON export: {e}")))?;
    out.push('\n');
    Ok(out)
}

fn format_as_yaml(secrets: &BTreeMap<&str, &str>) -> Result<String> {
    serde_yaml_ng::to_string(secrets)
        .map_err(|e| ScrtError::SerializationError(format!("YAML export: {e}")))
}
