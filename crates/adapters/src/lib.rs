// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the terminal multiplexer, the identity
//! registry, and town configuration.

mod env;
pub mod gitignore;
pub mod identity;
pub mod pids;
pub mod session;
pub mod startup;
pub mod subprocess;
pub mod traced;

pub use identity::{BdRegistrar, IdentityError, IdentityRegistrar};
pub use session::{SessionAdapter, SessionError, SessionStyle, TmuxAdapter};
pub use startup::{ComposeError, RuntimeConfig, StartupComposer, TownComposer};
pub use traced::TracedSession;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use identity::{FakeIdentityRegistrar, IdentityCall};
#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSession, FakeSessionAdapter, SessionCall};
#[cfg(any(test, feature = "test-support"))]
pub use startup::{ComposerCall, FakeComposer};
