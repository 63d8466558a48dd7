//! # vigil-settings
//!
//! Configuration management with layered sources for the monitor.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`VigilSettings::default()`]
//! 2. **JSON file** — optional, deep-merged over defaults
//! 3. **Environment variables** — `VIGIL_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, deep_merge, load_settings};
pub use types::{
    MonitorSettings, ProviderSettings, ServerSettings, ToolSettings, VigilSettings,
};

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<VigilSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings with env var overrides only (no file). Use
/// [`init_settings`] at startup to install file-backed settings before any
/// accessor runs.
pub fn get_settings() -> &'static VigilSettings {
    SETTINGS.get_or_init(|| load_settings(None).unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
pub fn init_settings(settings: VigilSettings) -> std::result::Result<(), VigilSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_re_exported() {
        let a = serde_json::json!({"x": 1});
        let b = serde_json::json!({"y": 2});
        let merged = deep_merge(a, b);
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let settings = VigilSettings::default();
        assert_eq!(settings.tools.enabled, vec!["detectAnimal"]);
        assert_eq!(settings.monitor.flush_interval_ms, 5000);
    }
}
