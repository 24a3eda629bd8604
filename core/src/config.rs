//! Client configuration.
//!
//! Built in code, deserialized from JSON, or read from the environment:
//!
//! - `ADMIN_API_BASE_URL`: API root, e.g. `https://service-provider.runasp.net/api`
//! - `ADMIN_SYNC_SETTLE_POLICY`: `latest-issued` (default) or `last-settled`

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "ADMIN_API_BASE_URL";
pub const SETTLE_POLICY_ENV: &str = "ADMIN_SYNC_SETTLE_POLICY";

/// What happens when two fetches for the same slot are in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlePolicy {
    /// Only the most recently issued fetch may write the slot; older
    /// settlements are dropped.
    #[default]
    LatestIssued,
    /// Every settlement writes the slot, so whichever settles last wins
    /// even if it was issued first.
    LastSettled,
}

impl FromStr for SettlePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "latest-issued" => Ok(SettlePolicy::LatestIssued),
            "last-settled" => Ok(SettlePolicy::LastSettled),
            other => Err(ConfigError::InvalidSettlePolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub settle_policy: SettlePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            settle_policy: SettlePolicy::default(),
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://service-provider.runasp.net/api";

    /// Config rooted at `base_url`; a trailing `/` is dropped.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            ..Self::default()
        })
    }

    pub fn with_settle_policy(mut self, settle_policy: SettlePolicy) -> Self {
        self.settle_policy = settle_policy;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(BASE_URL_ENV) {
            Some(url) => Self::new(&url)?,
            None => Self::default(),
        };
        if let Some(policy) = lookup(SETTLE_POLICY_ENV) {
            config.settle_policy = policy.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.settle_policy, SettlePolicy::LatestIssued);
    }

    #[test]
    fn env_overrides_both_fields() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "http://127.0.0.1:3000/"),
            (SETTLE_POLICY_ENV, "last-settled"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.settle_policy, SettlePolicy::LastSettled);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(SETTLE_POLICY_ENV, "newest")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSettlePolicy("newest".to_string()));

        let err = ClientConfig::new("ftp://nope").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"settle_policy":"last-settled"}"#).unwrap();
        assert_eq!(config.base_url, ClientConfig::DEFAULT_BASE_URL);
        assert_eq!(config.settle_policy, SettlePolicy::LastSettled);
    }
}
