//! Client configuration: region, endpoint, timeouts, and TLS settings

use crate::error::{ClientError, Result};
use crate::registry::region::Region;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("ecr-client/", env!("CARGO_PKG_VERSION"));

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub region: String,
    /// Overrides the regional endpoint when set
    pub endpoint: Option<String>,
    pub timeout: u64,
    pub connect_timeout: u64,
    pub skip_tls: bool,
    pub user_agent: String,
    /// Named profile in the shared credentials file
    pub profile: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::default().name().to_string(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            skip_tls: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            profile: None,
        }
    }
}

impl ClientConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.resolve_region()?;

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ClientError::Config(format!(
                    "Invalid endpoint: {}. Must start with http:// or https://",
                    endpoint
                )));
            }
            url::Url::parse(endpoint)?;
        }

        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be greater than 0".to_string()));
        }
        if self.connect_timeout == 0 {
            return Err(ClientError::Config(
                "connect_timeout must be greater than 0".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ClientError::Config("user_agent cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Region with the endpoint override applied
    pub fn resolve_region(&self) -> Result<Region> {
        let region: Region = self
            .region
            .parse()
            .map_err(|e| ClientError::Config(format!("{}", e)))?;

        Ok(match &self.endpoint {
            Some(endpoint) => Region::Custom {
                name: region.name().to_string(),
                endpoint: Some(endpoint.clone()),
            },
            None => region,
        })
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Defaults overlaid with the environment, see [`ConfigOverlay::from_env`]
    pub fn from_env() -> Self {
        Self::default().apply(&ConfigOverlay::from_env())
    }

    /// Defaults overlaid with a JSON file, see [`ConfigOverlay::from_file`]
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::default().apply(&ConfigOverlay::from_file(path)?))
    }

    /// Replace every field the overlay sets, even when it equals the default
    pub fn apply(mut self, overlay: &ConfigOverlay) -> Self {
        if let Some(region) = &overlay.region {
            self.region = region.clone();
        }
        if let Some(endpoint) = &overlay.endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = overlay.timeout {
            self.timeout = timeout;
        }
        if let Some(connect_timeout) = overlay.connect_timeout {
            self.connect_timeout = connect_timeout;
        }
        if let Some(skip_tls) = overlay.skip_tls {
            self.skip_tls = skip_tls;
        }
        if let Some(user_agent) = &overlay.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(profile) = &overlay.profile {
            self.profile = Some(profile.clone());
        }
        self
    }
}

/// One configuration source; `None` leaves the lower layer's value alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigOverlay {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub connect_timeout: Option<u64>,
    pub skip_tls: Option<bool>,
    pub user_agent: Option<String>,
    pub profile: Option<String>,
}

impl ConfigOverlay {
    /// `AWS_REGION` / `AWS_DEFAULT_REGION`, `ECR_ENDPOINT_URL`,
    /// `ECR_CLIENT_TIMEOUT`, `ECR_SKIP_TLS`, `AWS_PROFILE`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            region: get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")),
            endpoint: get("ECR_ENDPOINT_URL"),
            timeout: get("ECR_CLIENT_TIMEOUT").and_then(|v| v.parse().ok()),
            connect_timeout: None,
            skip_tls: get("ECR_SKIP_TLS").map(|v| v.eq_ignore_ascii_case("true") || v == "1"),
            user_agent: None,
            profile: get("AWS_PROFILE"),
        }
    }

    /// JSON file with any subset of the [`ClientConfig`] fields
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let overlay: ConfigOverlay = serde_json::from_str(&content)?;
        Ok(overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("AWS_DEFAULT_REGION", "eu-central-1"),
            ("ECR_ENDPOINT_URL", "http://localhost:4566"),
            ("ECR_CLIENT_TIMEOUT", "15"),
            ("ECR_SKIP_TLS", "TRUE"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .apply(&ConfigOverlay::from_lookup(|name| vars.get(name).map(|v| v.to_string())));
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.timeout, 15);
        assert!(config.skip_tls);
        assert_eq!(config.profile, None);
    }

    #[test]
    fn test_aws_region_wins_over_default_region() {
        let vars: HashMap<&str, &str> =
            [("AWS_REGION", "us-west-2"), ("AWS_DEFAULT_REGION", "eu-west-1")]
                .into_iter()
                .collect();
        let overlay = ConfigOverlay::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(overlay.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("not a region").validate().is_err());
        assert!(ClientConfig::default().with_endpoint("localhost:4566").validate().is_err());
        assert!(ClientConfig::default().with_timeout(0).validate().is_err());
    }

    #[test]
    fn test_resolve_region_applies_endpoint() {
        let config = ClientConfig::new("us-east-2").with_endpoint("http://127.0.0.1:9000");
        let region = config.resolve_region().unwrap();
        assert_eq!(region.name(), "us-east-2");
        assert_eq!(region.endpoint().unwrap().as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let base = ClientConfig::new("eu-west-1").with_timeout(30);
        let overlay = ConfigOverlay {
            skip_tls: Some(true),
            ..Default::default()
        };
        let config = base.apply(&overlay);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.timeout, 30);
        assert!(config.skip_tls);
    }

    #[test]
    fn test_env_default_values_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecr.json");
        std::fs::write(&path, r#"{"region": "eu-west-1", "timeout": 20, "skip_tls": true}"#).unwrap();

        let vars: HashMap<&str, &str> = [
            ("AWS_REGION", "us-east-1"),
            ("ECR_CLIENT_TIMEOUT", "60"),
            ("ECR_SKIP_TLS", "false"),
        ]
        .into_iter()
        .collect();
        let env = ConfigOverlay::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        let config = ClientConfig::default()
            .apply(&ConfigOverlay::from_file(&path).unwrap())
            .apply(&env);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(!config.skip_tls);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecr.json");
        std::fs::write(&path, r#"{"region": "ap-south-1", "timeout": 20}"#).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.timeout, 20);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
