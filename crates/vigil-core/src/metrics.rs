//! Metric name constants.
//!
//! Every crate that records a metric names it through these constants, so
//! the emitters and the exposition endpoint cannot drift apart.

/// Monitor cycles total (counter, labels: outcome).
pub const MONITOR_CYCLES_TOTAL: &str = "monitor_cycles_total";
/// Monitor cycle duration in milliseconds (histogram).
pub const MONITOR_CYCLE_DURATION_MS: &str = "monitor_cycle_duration_ms";
/// Tool executions total (counter, labels: tool, outcome).
pub const TOOL_EXECUTIONS_TOTAL: &str = "tool_executions_total";
/// Tool execution duration in milliseconds (histogram, labels: tool).
pub const TOOL_EXECUTION_DURATION_MS: &str = "tool_execution_duration_ms";
/// Provider requests total (counter).
pub const PROVIDER_REQUESTS_TOTAL: &str = "provider_requests_total";
/// Provider errors total (counter, labels: category).
pub const PROVIDER_ERRORS_TOTAL: &str = "provider_errors_total";
/// Provider request duration in milliseconds (histogram).
pub const PROVIDER_REQUEST_DURATION_MS: &str = "provider_request_duration_ms";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            MONITOR_CYCLES_TOTAL,
            MONITOR_CYCLE_DURATION_MS,
            TOOL_EXECUTIONS_TOTAL,
            TOOL_EXECUTION_DURATION_MS,
            PROVIDER_REQUESTS_TOTAL,
            PROVIDER_ERRORS_TOTAL,
            PROVIDER_REQUEST_DURATION_MS,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
