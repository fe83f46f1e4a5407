// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Gas Town agent session lifecycle engine

mod config;
pub mod dialog;
mod env;
mod error;
mod manager;
mod overrides;
pub mod probe;
pub mod prompt;

pub use config::{LifecycleConfig, SUPPORTED_SHELLS};
pub use error::LifecycleError;
pub use manager::{restart, ArchitectManager, StartReport, StartupStep, StartupWarning};
pub use overrides::parse_env_overrides;
pub use probe::probe;
pub use prompt::startup_prompt;
