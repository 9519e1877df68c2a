//! Controller policies.

use serde::{Deserialize, Serialize};

/// How background history fetch failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Log and keep the previous data.
    #[default]
    Silent,
    /// Log, keep the previous data, and raise an error notice.
    Surface,
}

/// Tunables shared by every console front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Reporting policy for history and audit log fetch failures.
    pub fetch_failures: FetchFailurePolicy,
    /// Authenticate with the persisted credential on start.
    pub resume_session: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            fetch_failures: FetchFailurePolicy::Silent,
            resume_session: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ConsoleConfig = serde_json::from_str("{}").expect("config");
        assert_eq!(config, ConsoleConfig::default());
        assert!(config.resume_session);

        let surfaced: ConsoleConfig =
            serde_json::from_str(r#"{"fetch_failures":"surface"}"#).expect("config");
        assert_eq!(surfaced.fetch_failures, FetchFailurePolicy::Surface);
        assert!(surfaced.resume_session);
    }
}
