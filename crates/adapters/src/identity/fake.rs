// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity registrar for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{IdentityError, IdentityRegistrar};
use async_trait::async_trait;
use gt_core::{AgentFields, IdentityId, IdentityRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded registrar call
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityCall {
    Lookup {
        town_root: PathBuf,
        id: String,
    },
    Create {
        town_root: PathBuf,
        id: String,
        description: String,
        fields: AgentFields,
    },
}

#[derive(Default)]
struct FakeIdentityState {
    records: HashMap<String, IdentityRecord>,
    calls: Vec<IdentityCall>,
    fail_lookup: Option<String>,
    fail_create: Option<String>,
}

/// In-memory identity registry
#[derive(Clone, Default)]
pub struct FakeIdentityRegistrar {
    inner: Arc<Mutex<FakeIdentityState>>,
}

impl FakeIdentityRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        self.inner.lock().calls.clone()
    }

    pub fn get(&self, id: &str) -> Option<IdentityRecord> {
        self.inner.lock().records.get(id).cloned()
    }

    /// Seed an existing record
    pub fn insert(&self, id: &str) {
        self.inner.lock().records.insert(
            id.to_string(),
            IdentityRecord {
                id: IdentityId::new(id),
                title: String::new(),
                description: String::new(),
                status: "open".to_string(),
            },
        );
    }

    /// Make lookups fail with a command error (not a missing record)
    pub fn fail_lookup(&self, message: &str) {
        self.inner.lock().fail_lookup = Some(message.to_string());
    }

    pub fn fail_create(&self, message: &str) {
        self.inner.lock().fail_create = Some(message.to_string());
    }
}

#[async_trait]
impl IdentityRegistrar for FakeIdentityRegistrar {
    async fn lookup(
        &self,
        town_root: &Path,
        id: &IdentityId,
    ) -> Result<IdentityRecord, IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::Lookup {
            town_root: town_root.to_path_buf(),
            id: id.to_string(),
        });
        if let Some(ref msg) = inner.fail_lookup {
            return Err(IdentityError::CommandFailed(msg.clone()));
        }
        inner
            .records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))
    }

    async fn create(
        &self,
        town_root: &Path,
        id: &IdentityId,
        description: &str,
        fields: &AgentFields,
    ) -> Result<IdentityRecord, IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::Create {
            town_root: town_root.to_path_buf(),
            id: id.to_string(),
            description: description.to_string(),
            fields: fields.clone(),
        });
        if let Some(ref msg) = inner.fail_create {
            return Err(IdentityError::CommandFailed(msg.clone()));
        }
        if inner.records.contains_key(id.as_str()) {
            return Err(IdentityError::CommandFailed(format!("duplicate id: {}", id)));
        }
        let record = IdentityRecord {
            id: id.clone(),
            title: description.to_string(),
            description: fields.to_description_lines(),
            status: "open".to_string(),
        };
        inner.records.insert(id.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
