//! CLI error handling specs
//!
//! Verify error messages for invalid commands and arguments.

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    cli()
        .args(&["architect", "launch", "alpha"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn start_requires_rig() {
    cli()
        .args(&["architect", "start"])
        .fails()
        .stderr_has("<RIG>");
}

#[test]
fn outside_a_town_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .pwd(dir.path())
        .args(&["architect", "status", "alpha"])
        .fails()
        .stderr_has("not in a Gas Town workspace");
}

#[test]
fn town_root_from_env_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .pwd(dir.path())
        .env("GT_TOWN_ROOT", dir.path().join("missing"))
        .args(&["architect", "status", "alpha"])
        .fails()
        .stderr_has("GT_TOWN_ROOT is not a directory");
}
