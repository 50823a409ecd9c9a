//! Integration tests for the Credvault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The passphrase comes from `CREDVAULT_PASSPHRASE`, and each project
//! dir gets a `.credvault.toml` with cheap Argon2 settings.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASS: &str = "correct horse battery staple";

const FAST_CONFIG: &str = "argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n";

/// Helper: get a Command pointing at the credvault binary.
fn credvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("credvault").expect("binary should exist");
    cmd.env_remove("CREDVAULT_PASSPHRASE");
    cmd.env_remove("CREDVAULT_LOG");
    cmd.env_remove("CREDVAULT_VAULT");
    cmd.env_remove("CREDVAULT_CONFIG");
    cmd
}

/// A project directory with fast settings.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml").write_str(FAST_CONFIG).unwrap();
    tmp
}

/// Run a command in `dir` with `passphrase` in the environment.
fn with_pass(dir: &TempDir, passphrase: &str) -> Command {
    let mut cmd = credvault();
    cmd.current_dir(dir.path())
        .env("CREDVAULT_PASSPHRASE", passphrase);
    cmd
}

fn init(dir: &TempDir) {
    with_pass(dir, PASS).arg("init").assert().success();
}

#[test]
fn help_flag_shows_usage() {
    credvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted vault for API credentials"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("unset"));
}

#[test]
fn version_flag_shows_version() {
    credvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn no_args_shows_help() {
    credvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn status_on_empty_dir() {
    let tmp = project();
    credvault()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not initialized"));

    credvault()
        .current_dir(tmp.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initialized\": false"));
}

#[test]
fn get_on_missing_vault_fails() {
    let tmp = project();
    with_pass(&tmp, PASS)
        .args(["get", "GEMINI_API_KEY"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn init_creates_vault_file() {
    let tmp = project();
    init(&tmp);

    tmp.child(".credvault/vault.json")
        .assert(predicate::path::exists())
        .assert(predicate::str::contains("\"hash\""))
        .assert(predicate::str::contains("\"authTag\""));

    credvault()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
}

#[test]
fn init_twice_is_refused() {
    let tmp = project();
    init(&tmp);
    with_pass(&tmp, "another passphrase")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_rejects_short_passphrase() {
    let tmp = project();
    with_pass(&tmp, "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    tmp.child(".credvault/vault.json")
        .assert(predicate::path::missing());
}

#[test]
fn set_list_get_roundtrip() {
    let tmp = project();
    init(&tmp);

    with_pass(&tmp, PASS)
        .args(["set", "GEMINI_API_KEY", "sk-ABCDEFGHIJKL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    with_pass(&tmp, PASS)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-A...IJKL"))
        .stdout(predicate::str::contains("OPENAI_API_KEY"))
        .stdout(predicate::str::contains("sk-ABCDEFGHIJKL").not());

    with_pass(&tmp, PASS)
        .args(["get", "GEMINI_API_KEY"])
        .assert()
        .success()
        .stdout("sk-ABCDEFGHIJKL\n");
}

#[test]
fn set_reads_piped_value() {
    let tmp = project();
    init(&tmp);

    with_pass(&tmp, PASS)
        .args(["set", "OPENAI_API_KEY"])
        .write_stdin("sk-from-stdin-9876\n")
        .assert()
        .success();

    with_pass(&tmp, PASS)
        .args(["get", "OPENAI_API_KEY"])
        .assert()
        .success()
        .stdout("sk-from-stdin-9876\n");
}

#[test]
fn set_rejects_bad_key_name() {
    let tmp = project();
    init(&tmp);
    with_pass(&tmp, PASS)
        .args(["set", "not a name", "value-123456"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credential name"));
}

#[test]
fn wrong_passphrase_is_reported_generically() {
    let tmp = project();
    init(&tmp);
    with_pass(&tmp, "Tr0ub4dor&3")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid passphrase"));
}

#[test]
fn corrupted_vault_reads_as_invalid_passphrase() {
    let tmp = project();
    init(&tmp);
    tmp.child(".credvault/vault.json")
        .write_str("{\"meta\": {\"hash\": \"x\"")
        .unwrap();

    with_pass(&tmp, PASS)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid passphrase"))
        .stderr(predicate::str::contains("corrupted").not());
}

#[test]
fn unset_removes_credential() {
    let tmp = project();
    init(&tmp);
    with_pass(&tmp, PASS)
        .args(["set", "LINKEDIN_ACCESS_TOKEN", "li-token-abcdefgh"])
        .assert()
        .success();

    with_pass(&tmp, PASS)
        .args(["unset", "LINKEDIN_ACCESS_TOKEN", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    with_pass(&tmp, PASS)
        .args(["get", "LINKEDIN_ACCESS_TOKEN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn explicit_vault_path_is_used() {
    let tmp = project();
    with_pass(&tmp, PASS)
        .args(["--vault", "elsewhere/keys.json", "init"])
        .assert()
        .success();
    tmp.child("elsewhere/keys.json")
        .assert(predicate::path::exists());
    tmp.child(".credvault/vault.json")
        .assert(predicate::path::missing());
}

#[cfg(feature = "audit-log")]
#[test]
fn audit_records_operations_without_values() {
    let tmp = project();
    init(&tmp);
    with_pass(&tmp, PASS)
        .args(["set", "GEMINI_API_KEY", "sk-ABCDEFGHIJKL"])
        .assert()
        .success();
    with_pass(&tmp, "Tr0ub4dor&3")
        .arg("list")
        .assert()
        .failure();

    credvault()
        .current_dir(tmp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("GEMINI_API_KEY"))
        .stdout(predicate::str::contains("denied"))
        .stdout(predicate::str::contains("sk-ABCDEFGHIJKL").not());
}

#[test]
fn completions_generate_for_bash() {
    credvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}
