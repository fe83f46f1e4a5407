// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn architect_prompt_addresses_rig_inbox() {
    assert_eq!(
        startup_prompt("copperhead"),
        "[GAS TOWN] copperhead/architect <- mayor • review\n\n\
         Run `gt prime` and check mail for review requests."
    );
}

#[test]
fn prompt_is_deterministic() {
    assert_eq!(startup_prompt("alpha"), startup_prompt("alpha"));
    assert_ne!(startup_prompt("alpha"), startup_prompt("beta"));
}

#[test]
fn empty_instructions_leave_only_beacon() {
    let beacon = Beacon {
        recipient: "a/architect".to_string(),
        sender: "mayor".to_string(),
        topic: "review".to_string(),
    };
    assert_eq!(
        build_startup_prompt(&beacon, ""),
        "[GAS TOWN] a/architect <- mayor • review"
    );
}
