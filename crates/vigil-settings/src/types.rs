//! Settings type definitions with compiled defaults.
//!
//! Field names serialize as camelCase to match the JSON settings file.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VigilSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Monitor cycle settings.
    pub monitor: MonitorSettings,
    /// Chat provider settings.
    pub provider: ProviderSettings,
    /// Tool enablement settings.
    pub tools: ToolSettings,
}

/// HTTP server settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            request_timeout_secs: 60,
        }
    }
}

/// Monitor cycle settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    /// Inputs shorter than this many characters are dropped as noise.
    pub min_message_chars: usize,
    /// Interval of the fallback buffer flush, in milliseconds.
    pub flush_interval_ms: u64,
    /// Questions asked before the interview wraps up.
    pub max_questions: u32,
    /// Overall score below which the interview concludes early.
    pub min_advance_score: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            min_message_chars: 3,
            flush_interval_ms: 5000,
            max_questions: 5,
            min_advance_score: 50.0,
        }
    }
}

/// Chat provider settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// API base URL, without the `/chat/completions` suffix.
    pub api_base: String,
    /// Model ID to request.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".into(),
            model: "gpt-4.1-nano".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            request_timeout_secs: 30,
        }
    }
}

/// Tool enablement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    /// Names of tools advertised to the monitor model.
    pub enabled: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            enabled: vec!["detectAnimal".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = VigilSettings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.monitor.min_message_chars, 3);
        assert_eq!(settings.monitor.flush_interval_ms, 5000);
        assert_eq!(settings.monitor.max_questions, 5);
        assert!((settings.monitor.min_advance_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(settings.provider.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.tools.enabled, vec!["detectAnimal"]);
    }

    #[test]
    fn camel_case_field_names() {
        let json = serde_json::to_value(VigilSettings::default()).unwrap();
        assert!(json["monitor"].get("minMessageChars").is_some());
        assert!(json["provider"].get("apiKeyEnv").is_some());
        assert!(json["server"].get("requestTimeoutSecs").is_some());
    }

    #[test]
    fn missing_sections_fill_from_defaults() {
        let settings: VigilSettings = serde_json::from_str(r#"{"server": {"port": 9090}}"#).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.monitor.max_questions, 5);
    }
}
