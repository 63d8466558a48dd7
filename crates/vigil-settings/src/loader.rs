//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`VigilSettings::default()`]
//! 2. If a settings file is given and exists, deep-merge its values over
//!    the defaults
//! 3. Apply `VIGIL_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::VigilSettings;

/// Load settings from an optional file path with env var overrides.
///
/// A missing file yields defaults. A file with invalid JSON is an error.
pub fn load_settings(path: Option<&Path>) -> Result<VigilSettings> {
    let defaults = serde_json::to_value(VigilSettings::default())?;

    let merged = match path {
        Some(path) if path.exists() => {
            debug!(?path, "loading settings from file");
            let content = std::fs::read_to_string(path)?;
            let user: Value = serde_json::from_str(&content)?;
            deep_merge(defaults, user)
        }
        Some(path) => {
            debug!(?path, "settings file not found, using defaults");
            defaults
        }
        None => defaults,
    };

    let mut settings: VigilSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Strict parsing: integers must be valid and in range, floats must parse;
/// invalid values are silently ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut VigilSettings) {
    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("VIGIL_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("VIGIL_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_u64("VIGIL_REQUEST_TIMEOUT_SECS", 1, 3600) {
        settings.server.request_timeout_secs = v;
    }

    // ── Monitor ─────────────────────────────────────────────────────
    if let Some(v) = read_env_u64("VIGIL_MIN_MESSAGE_CHARS", 1, 1024) {
        settings.monitor.min_message_chars = v as usize;
    }
    if let Some(v) = read_env_u64("VIGIL_FLUSH_INTERVAL_MS", 100, 600_000) {
        settings.monitor.flush_interval_ms = v;
    }
    if let Some(v) = read_env_u64("VIGIL_MAX_QUESTIONS", 1, 100) {
        settings.monitor.max_questions = v as u32;
    }
    if let Some(v) = read_env_f64("VIGIL_MIN_ADVANCE_SCORE", 0.0, 100.0) {
        settings.monitor.min_advance_score = v;
    }

    // ── Provider ────────────────────────────────────────────────────
    if let Some(v) = read_env_string("VIGIL_API_BASE") {
        settings.provider.api_base = v;
    }
    if let Some(v) = read_env_string("VIGIL_MODEL") {
        settings.provider.model = v;
    }
    if let Some(v) = read_env_string("VIGIL_API_KEY_ENV") {
        settings.provider.api_key_env = v;
    }
    if let Some(v) = read_env_u64("VIGIL_PROVIDER_TIMEOUT_SECS", 1, 600) {
        settings.provider.request_timeout_secs = v;
    }

    // ── Tools ───────────────────────────────────────────────────────
    if let Some(v) = read_env_string("VIGIL_ENABLED_TOOLS") {
        settings.tools.enabled = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as an `f64` within a range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_f64(name: &str, min: f64, max: f64) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_f64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid f64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
