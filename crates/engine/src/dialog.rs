// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detection and dismissal of interactive startup dialogs

use gt_adapters::{SessionAdapter, SessionError};
use std::time::Duration;

/// Result of polling for an interactive prompt in a session pane.
#[derive(Debug, PartialEq, Eq)]
pub enum PromptResult {
    /// Prompt detected and answered.
    Handled,
    /// No prompt detected within the polling window.
    NotPresent,
}

/// A prompt to look for and the keys that answer it.
pub struct PromptCheck<'a> {
    /// All of these must be present in the pane output.
    pub detect: &'a [&'a str],
    /// Keys sent in order once the prompt is detected.
    pub response: &'a [&'a str],
}

/// Claude's first-run warning when started with permission checks skipped.
pub const BYPASS_PERMISSIONS: PromptCheck<'static> = PromptCheck {
    detect: &["Bypass Permissions mode", "1. No", "2. Yes"],
    response: &["2"],
};

/// Poll a session pane for an interactive prompt and respond.
///
/// Capture errors are retried; a failure to send the response is returned.
pub async fn poll_for_prompt<S: SessionAdapter>(
    sessions: &S,
    session_id: &str,
    max_attempts: usize,
    interval: Duration,
    check: &PromptCheck<'_>,
) -> Result<PromptResult, SessionError> {
    for attempt in 0..max_attempts {
        if attempt > 0 {
            tokio::time::sleep(interval).await;
        }

        let output = match sessions.capture_output(session_id, 50).await {
            Ok(out) => out,
            Err(_) => continue,
        };

        if check.detect.iter().all(|p| output.contains(p)) {
            for key in check.response {
                sessions.send(session_id, key).await?;
            }
            return Ok(PromptResult::Handled);
        }
    }

    Ok(PromptResult::NotPresent)
}

#[cfg(test)]
#[path = "dialog_tests.rs"]
mod tests;
