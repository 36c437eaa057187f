//! End-to-end tests of the `arrastools` binary in dry-run mode.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::NamedTempFile;

/// Binary pointed at an empty config so the user's own file is never read.
fn arrastools(config: &NamedTempFile) -> Command {
    let mut cmd = cargo_bin_cmd!("arrastools");
    cmd.arg("--config").arg(config.path()).env("NO_COLOR", "1");
    cmd
}

fn empty_config() -> NamedTempFile {
    NamedTempFile::new().unwrap()
}

#[test]
fn test_arena_dry_run_in_phase() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "arena", "in-phase", "--max", "3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("text $arena size 2 2")
                .and(predicate::str::contains("text $arena size 4 4"))
                .and(predicate::str::contains("text $arena size 6 6"))
                .and(predicate::str::contains("text $arena size 8 8").not()),
        )
        .stderr(predicate::str::contains("Sent 3 commands"));
}

#[test]
fn test_arena_variant_number_alias() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "arena", "3", "--max", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text $arena size 2 1024"));
}

#[test]
fn test_script_inverse_phase() {
    let config = empty_config();
    arrastools(&config)
        .args(["script", "inverse-phase", "--count", "3"])
        .assert()
        .success()
        .stdout("$arena size 2 1024\n$arena size 4 1022\n$arena size 6 1020\n");
}

#[test]
fn test_script_odd_step_is_normalized() {
    let config = empty_config();
    arrastools(&config)
        .args(["script", "in-phase", "--count", "2", "--step", "3"])
        .assert()
        .success()
        .stdout("$arena size 2 2\n$arena size 4 4\n");
}

#[test]
fn test_config_supplies_step() {
    let config = empty_config();
    std::fs::write(config.path(), "step = 10\n").unwrap();
    arrastools(&config)
        .args(["script", "in-phase", "--count", "2"])
        .assert()
        .success()
        .stdout("$arena size 2 2\n$arena size 12 12\n");
}

#[test]
fn test_list_json() {
    let config = empty_config();
    arrastools(&config)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"name\": \"circles\"")
                .and(predicate::str::contains("\"name\": \"arena_close\"")),
        );
}

#[test]
fn test_run_macro_dry_run() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "run", "circle"])
        .assert()
        .success()
        .stdout("press `\ntype c\ntype h\nrelease `\n");
}

#[test]
fn test_unknown_macro_fails() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "run", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown macro: nope"));
}

#[test]
fn test_unreadable_config_fails() {
    cargo_bin_cmd!("arrastools")
        .args(["--config", "/nonexistent/arrastools.toml", "list"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_macro_reported_before_opening_input() {
    // No --dry-run: the lookup must fail before the native sink is touched
    let config = empty_config();
    arrastools(&config)
        .args(["run", "nope"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Unknown macro: nope")
                .and(predicate::str::contains("Press Ctrl+C").not()),
        );
}

#[test]
fn test_benchmark_zero_uses_default_amount() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "benchmark", "0"])
        .write_stdin("\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Timing circles*5000"))
        .stdout(predicate::str::contains("text > ["));
}

#[test]
fn test_unicode_dry_run() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "unicode", "004100000042"])
        .assert()
        .success()
        .stdout("text A B\n");
}

#[test]
fn test_unicode_rejects_partial_group() {
    let config = empty_config();
    arrastools(&config)
        .args(["--dry-run", "unicode", "00410"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple of 4"));
}
