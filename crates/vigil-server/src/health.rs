//! Health check endpoint payload.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Response body for `GET /health`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server can respond.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Number of live interview sessions.
    pub active_sessions: usize,
}

/// Build a health response from current server state.
#[must_use]
pub fn health_check(start_time: Instant, active_sessions: usize) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        active_sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check(Instant::now(), 0);
        assert_eq!(resp.status, "ok");
    }

    #[test]
    fn uptime_starts_near_zero() {
        let resp = health_check(Instant::now(), 0);
        assert!(resp.uptime_secs < 2);
    }

    #[test]
    fn session_count_passes_through() {
        let resp = health_check(Instant::now(), 7);
        assert_eq!(resp.active_sessions, 7);
    }

    #[test]
    fn serializes_expected_fields() {
        let resp = health_check(Instant::now(), 3);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json.get("uptime_secs").is_some());
        assert_eq!(json["active_sessions"], 3);
    }
}
