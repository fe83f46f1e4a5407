//! `gt architect status` specs for a rig with no session

use crate::prelude::*;

// A rig name unlikely to have a live session on the test host
const RIG: &str = "specs-status-rig";

#[test]
fn status_json_for_stopped_architect() {
    let town = Town::empty();
    town.rig(RIG);

    let output = town
        .gt()
        .args(&["architect", "status", RIG, "--json"])
        .passes()
        .stdout();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "running": false, "rig_name": RIG })
    );
    assert!(output.contains("\n  \"running\": false"), "pretty-printed: {output}");
}

#[test]
fn status_text_for_stopped_architect() {
    let town = Town::empty();
    town.rig(RIG);

    town.gt()
        .env("GT_TOWN_ROOT", town.path())
        .args(&["architect", "status", RIG])
        .passes()
        .stdout_eq(&format!("Architect: {RIG}\n\n  State: ○ stopped\n"));
}
