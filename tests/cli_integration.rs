//! Integration tests for the scrt CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`, always
//! through the `local` storage type in a temporary directory.  Passwords
//! are passed through `SCRT_PASSWORD` so nothing prompts.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const SCRT_VARS: &[&str] = &[
    "SCRT_CONFIG",
    "SCRT_PASSWORD",
    "SCRT_STORAGE",
    "SCRT_LOCAL_PATH",
    "SCRT_S3_BUCKET_NAME",
    "SCRT_S3_KEY",
    "SCRT_S3_REGION",
    "SCRT_S3_ENDPOINT_URL",
    "SCRT_GIT_URL",
    "SCRT_GIT_PATH",
    "SCRT_GIT_BRANCH",
    "SCRT_GIT_CHECKOUT",
    "SCRT_GIT_MESSAGE",
    "RUST_LOG",
];

/// Helper: the scrt binary with a clean environment, run inside `dir`.
fn scrt(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("scrt").expect("binary should exist");
    for var in SCRT_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir.path());
    cmd
}

/// Helper: scrt configured for a local store in `dir` with password "pw123".
fn local(dir: &TempDir) -> Command {
    let mut cmd = scrt(dir);
    cmd.env("SCRT_STORAGE", "local")
        .env("SCRT_LOCAL_PATH", dir.path().join("store.scrt"))
        .env("SCRT_PASSWORD", "pw123");
    cmd
}

/// A temp dir holding an empty `.scrt`, so config discovery never reaches
/// files outside it.
fn isolated() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".scrt").write_str("").unwrap();
    tmp
}

fn init(dir: &TempDir) {
    local(dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    let tmp = isolated();
    scrt(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("secret manager"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("unset"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("storage"))
        .stdout(predicate::str::contains("--local-path"));
}

#[test]
fn version_command_shows_version() {
    let tmp = isolated();
    scrt(&tmp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "scrt {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_args_shows_help() {
    let tmp = isolated();
    scrt(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn storage_lists_backends() {
    let tmp = isolated();
    scrt(&tmp)
        .arg("storage")
        .assert()
        .success()
        .stdout(predicate::str::contains("local"))
        .stdout(predicate::str::contains("s3"))
        .stdout(predicate::str::contains("git"))
        .stdout(predicate::str::contains("--s3-bucket-name"));
}

// ---------------------------------------------------------------------------
// Store lifecycle through the local backend
// ---------------------------------------------------------------------------

#[test]
fn init_creates_store_file() {
    let tmp = isolated();
    local(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store initialized"));

    tmp.child("store.scrt").assert(predicate::path::is_file());
}

#[test]
fn init_twice_requires_overwrite() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    local(&tmp).args(["init", "--overwrite"]).assert().success();
}

#[test]
fn set_get_list_unset_flow() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp).args(["set", "hello", "world"]).assert().success();
    local(&tmp).args(["set", "api", "key"]).assert().success();

    // Piped stdout: raw value, no trailing newline.
    local(&tmp)
        .args(["get", "hello"])
        .assert()
        .success()
        .stdout("world");

    local(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout("api\nhello\n");

    local(&tmp).args(["unset", "hello"]).assert().success();

    local(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout("api\n");
}

#[test]
fn unset_reports_either_removal_or_absence() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "k", "v"]).assert().success();

    local(&tmp)
        .args(["unset", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value unset for \"k\""))
        .stderr(predicate::str::contains("No value").not());

    local(&tmp)
        .args(["unset", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value unset").not())
        .stderr(predicate::str::contains("No value for \"k\""));
}

#[test]
fn completions_accept_known_shells_only() {
    let tmp = isolated();
    scrt(&tmp)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scrt"));

    scrt(&tmp)
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn set_reads_raw_bytes_from_stdin() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp)
        .args(["set", "multi"])
        .write_stdin("line one\nline two\n")
        .assert()
        .success();

    local(&tmp)
        .args(["get", "multi"])
        .assert()
        .success()
        .stdout("line one\nline two\n");
}

#[test]
fn set_existing_key_requires_overwrite() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "k", "one"]).assert().success();

    local(&tmp)
        .args(["set", "k", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--overwrite"));

    local(&tmp)
        .args(["set", "k", "two", "--overwrite"])
        .assert()
        .success();
    local(&tmp).args(["get", "k"]).assert().stdout("two");
}

#[test]
fn get_missing_key_fails() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp)
        .args(["get", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No value for \"nope\""));
}

#[test]
fn commands_on_missing_store_fail() {
    let tmp = isolated();
    local(&tmp)
        .args(["set", "k", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No store found"));
}

#[test]
fn wrong_password_fails() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "k", "v"]).assert().success();

    local(&tmp)
        .env("SCRT_PASSWORD", "wrong")
        .args(["get", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn password_flag_overrides_env() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp)
        .env("SCRT_PASSWORD", "wrong")
        .args(["--password", "pw123", "list"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_storage_fails() {
    let tmp = isolated();
    scrt(&tmp)
        .args(["--password", "pw", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing storage"));
}

#[test]
fn unknown_storage_fails() {
    let tmp = isolated();
    scrt(&tmp)
        .args(["--password", "pw", "--storage", "ftp", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown storage type: ftp"));
}

#[test]
fn missing_password_without_terminal_fails() {
    let tmp = isolated();
    local(&tmp)
        .env_remove("SCRT_PASSWORD")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing password"));
}

#[test]
fn config_file_is_discovered_from_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.scrt");
    tmp.child(".scrt")
        .write_str(&format!(
            "storage: local\npassword: from-file\nlocal:\n  path: {}\n",
            store.display()
        ))
        .unwrap();
    let nested = tmp.child("a/b");
    nested.create_dir_all().unwrap();

    scrt(&tmp)
        .current_dir(nested.path())
        .arg("init")
        .assert()
        .success();
    assert!(store.is_file());

    scrt(&tmp)
        .current_dir(nested.path())
        .args(["set", "k", "v"])
        .assert()
        .success();

    // Flags override the file.
    scrt(&tmp)
        .current_dir(nested.path())
        .args(["--password", "other", "get", "k"])
        .assert()
        .failure();
}

#[test]
fn explicit_config_must_exist() {
    let tmp = isolated();
    scrt(&tmp)
        .args(["--config", "missing.yml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yml"));
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_json_and_dotenv() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "A", "hello"]).assert().success();
    local(&tmp).args(["set", "B", "has space"]).assert().success();

    local(&tmp)
        .args(["export", "--format", "dotenv"])
        .assert()
        .success()
        .stdout("A=\"hello\"\nB=\"has space\"\n");

    local(&tmp)
        .args(["export", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"A\": \"hello\""));
}

#[test]
fn export_dotenv_escapes_dollar_and_backslash() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "P", "cost$100\\x"]).assert().success();

    local(&tmp)
        .args(["export", "-f", "dotenv"])
        .assert()
        .success()
        .stdout("P=\"cost\\$100\\\\x\"\n");
}

#[test]
fn export_to_file() {
    let tmp = isolated();
    init(&tmp);
    local(&tmp).args(["set", "KEY", "value"]).assert().success();

    local(&tmp)
        .args(["export", "-f", "yaml", "-o", "out.yml"])
        .assert()
        .success();

    tmp.child("out.yml")
        .assert(predicate::str::contains("KEY: value"));
}

#[test]
fn export_refuses_to_overwrite_store() {
    let tmp = isolated();
    init(&tmp);

    local(&tmp)
        .args(["export", "-f", "json", "-o"])
        .arg(tmp.path().join("store.scrt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing"));
}

#[test]
fn export_rejects_unknown_format() {
    let tmp = isolated();
    local(&tmp)
        .args(["export", "-f", "xml"])
        .assert()
        .failure();
}
