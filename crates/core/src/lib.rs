// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gt-core: domain types for managing rig agent sessions

pub mod id;
pub mod identity;
pub mod rig;
pub mod role;
pub mod session;
pub mod theme;
pub mod town;

pub use identity::{agent_identity_id, mail_address, AgentFields, IdentityId, IdentityRecord};
pub use rig::{Rig, RigError};
pub use role::Role;
pub use session::{session_name, SessionInfo, SessionLiveness, SessionName};
pub use theme::{assign_theme, Theme};
pub use town::{find_town_root, infer_rig_from_path, rig_record_prefix, TownError};
