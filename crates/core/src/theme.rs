// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-bar themes assigned per rig.

/// A tmux status-bar color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub bg: &'static str,
    pub fg: &'static str,
}

impl Theme {
    /// Value for tmux's `status-style` option.
    pub fn status_style(&self) -> String {
        format!("bg={},fg={}", self.bg, self.fg)
    }
}

const fn theme(name: &'static str, bg: &'static str, fg: &'static str) -> Theme {
    Theme { name, bg, fg }
}

pub const PALETTE: &[Theme] = &[
    theme("ocean", "#1e3a5f", "#e0e0e0"),
    theme("forest", "#2d5a3d", "#e0e0e0"),
    theme("rust", "#8b4513", "#f5f5dc"),
    theme("plum", "#4a2c4a", "#e0e0e0"),
    theme("slate", "#3d4f5f", "#e0e0e0"),
    theme("ember", "#8b2500", "#f5f5dc"),
    theme("midnight", "#1a1a2e", "#c0c0c0"),
    theme("wine", "#722f37", "#f5f5dc"),
    theme("teal", "#1a5f5f", "#e0e0e0"),
    theme("copper", "#6d4c2f", "#f5f5dc"),
];

/// Pick a theme for a rig. The same rig name always gets the same theme.
pub fn assign_theme(rig_name: &str) -> Theme {
    let index = (fnv1a(rig_name.as_bytes()) % PALETTE.len() as u64) as usize;
    PALETTE[index]
}

// FNV-1a: stable across processes and platforms, unlike the std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
#[path = "theme_tests.rs"]
mod tests;
