// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-supplied `KEY=VALUE` environment overrides

/// Parse `KEY=VALUE` entries, splitting on the first `=`.
///
/// Entries without `=` or with an empty key are skipped. Keys and values are
/// taken verbatim. Order is kept so later entries win when applied in sequence.
pub fn parse_env_overrides(overrides: &[String]) -> Vec<(String, String)> {
    let mut parsed = Vec::with_capacity(overrides.len());
    for entry in overrides {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                parsed.push((key.to_string(), value.to_string()));
            }
            _ => tracing::debug!(entry, "skipping malformed env override"),
        }
    }
    parsed
}

#[cfg(test)]
#[path = "overrides_tests.rs"]
mod tests;
