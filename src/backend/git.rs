//! `git` storage: the blob is a file in a git repository.
//!
//! The repository is cloned into a temporary directory when the backend
//! is built; every `save` commits the new blob and pushes it back.
//! Requires a `git` executable on `PATH`.

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use super::{required, Backend, BackendFactory, StorageOption};
use crate::config::settings::non_empty;
use crate::config::{GitSettings, Settings};
use crate::errors::{Result, ScrtError};

const DEFAULT_MESSAGE: &str = "update secrets";
const DEFAULT_BRANCH: &str = "main";

const OPTIONS: &[StorageOption] = &[
    StorageOption {
        flag: "--git-url",
        description: "URL of the git repository",
        required: true,
    },
    StorageOption {
        flag: "--git-path",
        description: "path of the store file in the repository",
        required: true,
    },
    StorageOption {
        flag: "--git-branch",
        description: "branch to clone and push to",
        required: false,
    },
    StorageOption {
        flag: "--git-checkout",
        description: "revision to check out (read-only)",
        required: false,
    },
    StorageOption {
        flag: "--git-message",
        description: "commit message (default: \"update secrets\")",
        required: false,
    },
];

pub struct GitFactory;

impl BackendFactory for GitFactory {
    fn name(&self) -> &'static str {
        "git"
    }

    fn display_name(&self) -> &'static str {
        "Git"
    }

    fn description(&self) -> &'static str {
        "store secrets in a git repository"
    }

    fn options(&self) -> &'static [StorageOption] {
        OPTIONS
    }

    fn build(&self, settings: &Settings) -> Result<Box<dyn Backend>> {
        Ok(Box::new(GitBackend::new(&settings.git)?))
    }
}

/// Store blob kept in a file of a temporary clone.
pub struct GitBackend {
    url: String,
    path: PathBuf,
    message: String,
    detached: bool,
    workdir: TempDir,
}

impl GitBackend {
    /// Clone `url` (or start an empty repository if the remote has no
    /// refs yet) and optionally check out a fixed revision.
    pub fn new(options: &GitSettings) -> Result<Self> {
        let url = required(&options.url, "git repository URL (--git-url)")?;
        let path = relative_path(required(&options.path, "git file path (--git-path)")?)?;
        let branch = non_empty(&options.branch);

        let workdir = tempfile::Builder::new().prefix("scrt-git-").tempdir()?;
        let dir = workdir.path();

        if remote_is_empty(dir, url)? {
            info!(url, "remote repository is empty, starting a new one");
            git(dir, ["init", "--quiet"])?;
            git(dir, ["remote", "add", "origin", url])?;
            let branch = match branch {
                Some(b) => b.to_string(),
                None => default_branch(dir),
            };
            let head = format!("refs/heads/{branch}");
            git(dir, ["symbolic-ref", "HEAD", head.as_str()])?;
        } else {
            info!(url, "cloning repository");
            let mut args = vec!["clone", "--quiet"];
            if let Some(b) = branch {
                args.extend(["--branch", b]);
            }
            args.extend(["--", url, "."]);
            git(dir, args)?;
        }

        let checkout = non_empty(&options.checkout);
        if let Some(rev) = checkout {
            debug!(rev, "checking out revision");
            git(dir, ["checkout", "--quiet", "--detach", rev])?;
        }

        Ok(Self {
            url: url.to_string(),
            path,
            message: non_empty(&options.message)
                .unwrap_or(DEFAULT_MESSAGE)
                .to_string(),
            detached: checkout.is_some(),
            workdir,
        })
    }

    fn file(&self) -> PathBuf {
        self.workdir.path().join(&self.path)
    }
}

impl Backend for GitBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.file().try_exists()?)
    }

    fn load(&self) -> Result<Vec<u8>> {
        debug!(path = %self.path.display(), "reading store file from clone");
        Ok(fs::read(self.file())?)
    }

    fn save(&self, data: &[u8]) -> Result<()> {
        if self.detached {
            return Err(ScrtError::Backend(
                "cannot save store: a fixed revision is checked out (--git-checkout)".into(),
            ));
        }

        let dir = self.workdir.path();
        let file = self.file();
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, data)?;

        git(dir, [OsStr::new("add"), OsStr::new("--"), self.path.as_os_str()])?;

        let mut commit: Vec<&str> = Vec::new();
        if !has_identity(dir) {
            commit.extend(["-c", "user.name=scrt", "-c", "user.email=scrt@localhost"]);
        }
        commit.extend(["commit", "--quiet", "-m", self.message.as_str()]);
        git(dir, commit)?;

        info!(url = %self.url, "pushing store to remote");
        git(dir, ["push", "--quiet", "origin", "HEAD"])?;
        Ok(())
    }

    fn location(&self) -> String {
        format!("{}:{}", self.url, self.path.display())
    }
}

// ---------------------------------------------------------------------------
// git helpers
// ---------------------------------------------------------------------------

/// Run `git` in `dir` and return its stdout.
fn git<I, S>(dir: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let subcommand = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy())
        .find(|a| !a.starts_with('-') && !a.contains('='))
        .unwrap_or_default()
        .into_owned();
    debug!(subcommand = %subcommand, "running git");

    let output = Command::new("git")
        .current_dir(dir)
        .args(&args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| ScrtError::Backend(format!("cannot run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScrtError::Backend(format!(
            "git {subcommand} failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn remote_is_empty(dir: &Path, url: &str) -> Result<bool> {
    let refs = git(dir, ["ls-remote", url])?;
    Ok(refs.trim().is_empty())
}

fn default_branch(dir: &Path) -> String {
    git(dir, ["config", "--get", "init.defaultBranch"])
        .ok()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
}

fn has_identity(dir: &Path) -> bool {
    git(dir, ["config", "--get", "user.email"]).is_ok()
}

/// The store file must stay inside the clone.
fn relative_path(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || path.file_name().is_none() {
        return Err(ScrtError::Backend(format!(
            "invalid git file path {}: must be a relative file path inside the repository",
            path.display()
        )));
    }
    Ok(path)
}
