// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity registry adapters
//!
//! The registry stores mail-routable agent records ("beads"). Records are
//! keyed by [`IdentityId`] and live under the town root.

mod bd;

pub use bd::BdRegistrar;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIdentityRegistrar, IdentityCall};

use async_trait::async_trait;
use gt_core::{AgentFields, IdentityId, IdentityRecord};
use std::path::Path;
use thiserror::Error;

/// Errors from identity registry operations
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity not found: {0}")]
    NotFound(String),
    #[error("registry command failed: {0}")]
    CommandFailed(String),
    #[error("unexpected registry output: {0}")]
    InvalidOutput(String),
}

/// Adapter for the identity registry
#[async_trait]
pub trait IdentityRegistrar: Send + Sync + 'static {
    /// Fetch the record with this id from the registry at `town_root`
    async fn lookup(&self, town_root: &Path, id: &IdentityId)
        -> Result<IdentityRecord, IdentityError>;

    /// Create an agent record; fails if the registry rejects it
    async fn create(
        &self,
        town_root: &Path,
        id: &IdentityId,
        description: &str,
        fields: &AgentFields,
    ) -> Result<IdentityRecord, IdentityError>;
}
