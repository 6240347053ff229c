//! Shared configuration types for wakmeter
//!
//! These types are serialized by the core crate's config layer and read by
//! the command-line front end. Every field has a default so a partial or
//! missing config file still produces a usable engine.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Attribution
// ─────────────────────────────────────────────────────────────────────────────

/// Time windows used to pin an unattributed damage line on a recent caster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// A caster whose last cast is this close to the damage line wins outright
    #[serde(default = "default_recent_window_ms")]
    pub recent_window_ms: u64,
    /// Fallback window for slow-resolving effects
    #[serde(default = "default_sticky_window_ms")]
    pub sticky_window_ms: u64,
    /// PA refund lines only count if the player cast within this window
    #[serde(default = "default_pa_regain_window_ms")]
    pub pa_regain_window_ms: u64,
}

fn default_recent_window_ms() -> u64 {
    10_000
}

fn default_sticky_window_ms() -> u64 {
    20_000
}

fn default_pa_regain_window_ms() -> u64 {
    5_000
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            recent_window_ms: default_recent_window_ms(),
            sticky_window_ms: default_sticky_window_ms(),
            pa_regain_window_ms: default_pa_regain_window_ms(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Log file to tail when none is given on the command line
    #[serde(default)]
    pub log_path: Option<String>,
    /// Sleep between polls when the file has no new data
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Start tailing from the beginning of the file instead of its end
    #[serde(default)]
    pub from_start: bool,
}

fn default_poll_interval_ms() -> u64 {
    300
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            poll_interval_ms: default_poll_interval_ms(),
            from_start: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub attribution: AttributionConfig,
    /// Quiet period after the last related line before a spell cast is emitted
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// JSON table of spell costs per class (optional)
    #[serde(default)]
    pub spell_costs_path: Option<String>,
    #[serde(default)]
    pub reader: ReaderConfig,
}

fn default_debounce_ms() -> u64 {
    3_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attribution: AttributionConfig::default(),
            debounce_ms: default_debounce_ms(),
            spell_costs_path: None,
            reader: ReaderConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Config with a log file preset, everything else defaulted.
    pub fn with_log_path(path: impl Into<String>) -> Self {
        Self {
            reader: ReaderConfig {
                log_path: Some(path.into()),
                ..ReaderConfig::default()
            },
            ..Self::default()
        }
    }
}
