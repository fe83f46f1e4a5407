//! CLI help specs

use crate::prelude::*;

#[test]
fn no_subcommand_prints_help() {
    cli()
        .passes()
        .stdout_has("Usage: gt")
        .stdout_has("architect");
}

#[test]
fn architect_help_lists_subcommands() {
    cli()
        .args(&["architect", "--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status")
        .stdout_has("attach")
        .stdout_has("restart");
}

#[test]
fn arch_alias_shows_same_help() {
    let full = cli().args(&["architect", "--help"]).passes().stdout();
    let alias = cli().args(&["arch", "--help"]).passes().stdout();
    similar_asserts::assert_eq!(full, alias);
}

#[test]
fn start_help_documents_flags() {
    cli()
        .args(&["architect", "start", "--help"])
        .passes()
        .stdout_has("--agent")
        .stdout_has("--env <KEY=VALUE>");
}
