// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for session lifecycle operations

use gt_adapters::{ComposeError, SessionError};
use gt_core::SessionName;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while starting, stopping or querying an agent session
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("session {0} is already running")]
    AlreadyRunning(SessionName),
    #[error("session {0} is not running")]
    NotRunning(SessionName),
    #[error("resolving startup configuration")]
    ConfigResolution(#[source] ComposeError),
    #[error("creating session")]
    SessionCreation(#[source] SessionError),
    #[error("agent in {session} did not start within {}s", timeout.as_secs_f64())]
    StartupTimeout {
        session: SessionName,
        timeout: Duration,
    },
    #[error("killing zombie session")]
    ZombieCleanup(#[source] SessionError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LifecycleError {
    /// Outcomes callers report as a notice rather than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            LifecycleError::AlreadyRunning(_) | LifecycleError::NotRunning(_)
        )
    }
}
