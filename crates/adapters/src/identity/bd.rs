// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bd` CLI identity registrar

use super::{IdentityError, IdentityRegistrar};
use crate::subprocess::{run_with_timeout, BD_TIMEOUT};
use async_trait::async_trait;
use gt_core::{AgentFields, IdentityId, IdentityRecord};
use std::path::Path;
use tokio::process::Command;

/// Registrar backed by the `bd` command-line tool
#[derive(Debug, Clone)]
pub struct BdRegistrar {
    binary: String,
}

impl Default for BdRegistrar {
    fn default() -> Self {
        Self {
            binary: crate::env::bd_binary(),
        }
    }
}

impl BdRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `bd` executable
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, town_root: &Path, args: &[&str]) -> Result<String, IdentityError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).current_dir(town_root);
        let description = format!("{} {}", self.binary, args.first().unwrap_or(&""));
        let output = run_with_timeout(cmd, BD_TIMEOUT, &description)
            .await
            .map_err(IdentityError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(&stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl IdentityRegistrar for BdRegistrar {
    async fn lookup(
        &self,
        town_root: &Path,
        id: &IdentityId,
    ) -> Result<IdentityRecord, IdentityError> {
        let stdout = self.run(town_root, &["show", id.as_str(), "--json"]).await?;
        parse_record(&stdout)?.ok_or_else(|| IdentityError::NotFound(id.to_string()))
    }

    async fn create(
        &self,
        town_root: &Path,
        id: &IdentityId,
        description: &str,
        fields: &AgentFields,
    ) -> Result<IdentityRecord, IdentityError> {
        let body = fields.to_description_lines();
        let args = [
            "create",
            "--json",
            "--id",
            id.as_str(),
            "--type",
            "agent",
            "--title",
            description,
            "--description",
            body.as_str(),
        ];
        let stdout = self.run(town_root, &args).await?;
        tracing::info!(id = %id, "created identity record");
        // Older bd releases print nothing on create; synthesize the record
        Ok(parse_record(&stdout)?.unwrap_or_else(|| IdentityRecord {
            id: id.clone(),
            title: description.to_string(),
            description: body,
            status: "open".to_string(),
        }))
    }
}

fn classify_failure(stderr: &str) -> IdentityError {
    let lower = stderr.to_lowercase();
    if lower.contains("not found") || lower.contains("no issue") {
        IdentityError::NotFound(stderr.to_string())
    } else {
        IdentityError::CommandFailed(stderr.to_string())
    }
}

/// Parse `bd ... --json` output, which is either one record or an array.
///
/// Returns `Ok(None)` for empty output or an empty array.
pub(crate) fn parse_record(stdout: &str) -> Result<Option<IdentityRecord>, IdentityError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| IdentityError::InvalidOutput(format!("{}: {}", e, trimmed)))?;
    let record = match value {
        serde_json::Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Ok(None),
        },
        other => other,
    };
    serde_json::from_value(record)
        .map(Some)
        .map_err(|e| IdentityError::InvalidOutput(e.to_string()))
}

#[cfg(test)]
#[path = "bd_tests.rs"]
mod tests;
