use serde::{Deserialize, Serialize};
use std::{env, fmt};
use wx_core::MatchMode;

/// Deployment tier. Reported as the `environment` metrics label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Self; 5] = [Self::Local, Self::Dev, Self::Test, Self::Staging, Self::Prod];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }

    /// Short names and their long forms, case-insensitive. Unrecognised
    /// tiers run as `Local`.
    pub fn parse_or_local(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(value))
            .or_else(|| match value.to_ascii_lowercase().as_str() {
                "development" => Some(Self::Dev),
                "testing" => Some(Self::Test),
                "production" => Some(Self::Prod),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub region: Option<String>,
    pub metrics_addr: Option<String>,
    pub log_level: String,
    pub log_format: String,
    pub data_dir: String,
}

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, process_env)
    }

    pub fn from_lookup(default_service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: lookup("WX_SERVICE_NAME")
                .unwrap_or_else(|| default_service_name.to_string()),
            environment: lookup("WX_ENV")
                .map(|value| Environment::parse_or_local(&value))
                .unwrap_or_default(),
            region: lookup("WX_REGION"),
            metrics_addr: lookup("WX_METRICS_ADDR"),
            log_level: lookup("WX_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("WX_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            data_dir: lookup("WX_DATA_DIR").unwrap_or_else(|| "/var/lib/wx".to_string()),
        }
    }
}

/// Tuning for matching passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub parallel: bool,
    pub min_parallel_candidates: usize,
    pub deadline_ms: Option<u64>,
    pub mode: MatchMode,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_candidates: 512,
            deadline_ms: None,
            mode: MatchMode::Exclusive,
        }
    }
}

impl MatchingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            parallel: parse_bool(lookup("WX_MATCH_PARALLEL"), defaults.parallel),
            min_parallel_candidates: lookup("WX_MATCH_MIN_PARALLEL_CANDIDATES")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(defaults.min_parallel_candidates),
            deadline_ms: lookup("WX_MATCH_DEADLINE_MS")
                .and_then(|value| value.trim().parse::<u64>().ok()),
            mode: lookup("WX_MATCH_MODE")
                .and_then(|value| value.parse::<MatchMode>().ok())
                .unwrap_or(defaults.mode),
        }
    }
}

/// Where the worker reads its snapshot from and which hazards it runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub fixture_path: Option<String>,
    pub hazard_ids: Vec<String>,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            fixture_path: lookup("WX_FIXTURE_PATH").filter(|value| !value.trim().is_empty()),
            hazard_ids: lookup("WX_HAZARD_IDS")
                .unwrap_or_default()
                .split(',')
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|value| match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn service_defaults() {
        let config = ServiceConfig::from_lookup("wx-worker", lookup(&[]));
        assert_eq!(config.service_name, "wx-worker");
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.log_level, "info");
        assert!(config.metrics_addr.is_none());
    }

    #[rstest]
    #[case("production", Environment::Prod)]
    #[case("Staging", Environment::Staging)]
    #[case(" DEV ", Environment::Dev)]
    #[case("testing", Environment::Test)]
    #[case("qa", Environment::Local)]
    fn environment_names(#[case] raw: &str, #[case] expected: Environment) {
        let config = ServiceConfig::from_lookup("svc", lookup(&[("WX_ENV", raw)]));
        assert_eq!(config.environment, expected);
    }

    #[test]
    fn environment_labels_parse_back() {
        for tier in Environment::ALL {
            assert_eq!(Environment::parse_or_local(&tier.to_string()), tier);
        }
    }

    #[test]
    fn matching_overrides() {
        let config = MatchingConfig::from_lookup(lookup(&[
            ("WX_MATCH_PARALLEL", "off"),
            ("WX_MATCH_MIN_PARALLEL_CANDIDATES", "64"),
            ("WX_MATCH_DEADLINE_MS", "250"),
            ("WX_MATCH_MODE", "union"),
        ]));
        assert!(!config.parallel);
        assert_eq!(config.min_parallel_candidates, 64);
        assert_eq!(config.deadline_ms, Some(250));
        assert_eq!(config.mode, MatchMode::Union);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = MatchingConfig::from_lookup(lookup(&[
            ("WX_MATCH_PARALLEL", "maybe"),
            ("WX_MATCH_MIN_PARALLEL_CANDIDATES", "lots"),
            ("WX_MATCH_DEADLINE_MS", "-1"),
            ("WX_MATCH_MODE", "both"),
        ]));
        assert_eq!(config, MatchingConfig::default());
    }

    #[test]
    fn worker_hazard_list() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("WX_FIXTURE_PATH", "/tmp/snapshot.json"),
            ("WX_HAZARD_IDS", " a, ,b ,"),
        ]));
        assert_eq!(config.fixture_path.as_deref(), Some("/tmp/snapshot.json"));
        assert_eq!(config.hazard_ids, vec!["a", "b"]);
    }
}
