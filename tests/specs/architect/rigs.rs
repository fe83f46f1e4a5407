//! Rig resolution specs for `gt architect`

use crate::prelude::*;

#[test]
fn unknown_rig_fails() {
    let town = Town::empty();
    town.gt()
        .args(&["architect", "start", "nowhere"])
        .fails()
        .stderr_has("rig not found: nowhere");
}

#[test]
fn invalid_rig_name_fails() {
    let town = Town::empty();
    town.gt()
        .args(&["architect", "stop", "bad.name"])
        .fails()
        .stderr_has("invalid rig name");
}

#[test]
fn parked_rig_refuses_start() {
    let town = Town::empty();
    town.rig("alpha");
    town.file("alpha/.parked", "");

    town.gt()
        .args(&["architect", "start", "alpha"])
        .fails()
        .stderr_has("rig alpha is parked");
}

#[test]
fn docked_rig_refuses_restart() {
    let town = Town::empty();
    town.rig("alpha");
    town.file("alpha/.docked", "");

    town.gt()
        .args(&["architect", "restart", "alpha"])
        .fails()
        .stderr_has("rig alpha is docked");
}

#[test]
fn attach_from_town_root_needs_rig() {
    let town = Town::empty();
    town.gt()
        .args(&["architect", "attach"])
        .fails()
        .stderr_has("could not determine rig")
        .stderr_has("Usage: gt architect attach <rig>");
}

#[test]
fn town_root_is_found_from_inside_rig() {
    let town = Town::empty();
    let rig = town.rig("alpha");
    std::fs::create_dir_all(rig.join("src")).unwrap();

    cli()
        .pwd(rig.join("src"))
        .args(&["architect", "start", "beta"])
        .fails()
        .stderr_has("rig not found: beta");
}
