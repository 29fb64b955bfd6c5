//! Session configuration.
//!
//! Names the consumer/provider pair, the contract output directory, and the
//! optional broker publication settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a contract session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Consumer name recorded in the contract.
    pub consumer: String,

    /// Provider name recorded in the contract.
    pub provider: String,

    /// Directory the contract file is written into.
    #[serde(default = "default_contract_dir")]
    pub contract_dir: PathBuf,

    /// Broker base URL, if contracts are published after the run.
    #[serde(default)]
    pub broker_url: Option<String>,

    /// Whether an orderly teardown publishes the contract to the broker.
    #[serde(default)]
    pub publish: bool,

    /// Consumer application version attached to a publication.
    #[serde(default = "default_consumer_version")]
    pub consumer_version: String,
}

fn default_contract_dir() -> PathBuf {
    PathBuf::from("contracts")
}

fn default_consumer_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl SessionConfig {
    /// In-code configuration with defaults for everything but the pair names.
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            provider: provider.into(),
            contract_dir: default_contract_dir(),
            broker_url: None,
            publish: false,
            consumer_version: default_consumer_version(),
        }
    }

    /// Override the contract output directory.
    pub fn with_contract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.contract_dir = dir.into();
        self
    }

    /// Enable broker publication on orderly teardown.
    pub fn with_broker(mut self, url: impl Into<String>) -> Self {
        self.broker_url = Some(url.into());
        self.publish = true;
        self
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.consumer.is_empty() {
            anyhow::bail!("consumer name cannot be empty");
        }
        if self.provider.is_empty() {
            anyhow::bail!("provider name cannot be empty");
        }
        if self.publish && self.broker_url.is_none() {
            anyhow::bail!("publish is enabled but no broker_url is configured");
        }
        Ok(())
    }

    /// File name of the contract artifact for this pair.
    pub fn contract_file_name(&self) -> String {
        format!("{}-{}.json", self.consumer, self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
consumer: ProductServiceClient
provider: ProductService
"#;
        let config: SessionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.consumer, "ProductServiceClient");
        assert_eq!(config.contract_dir, PathBuf::from("contracts"));
        assert!(!config.publish);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
consumer: ProductServiceClient
provider: ProductService
contract_dir: build/contracts
broker_url: http://broker.internal:9292
publish: true
consumer_version: 2.3.1
"#;
        let config: SessionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.contract_dir, PathBuf::from("build/contracts"));
        assert_eq!(
            config.broker_url.as_deref(),
            Some("http://broker.internal:9292")
        );
        assert!(config.publish);
        assert_eq!(config.consumer_version, "2.3.1");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = r#"
consumer: a
provider: b
mock_port: 1234
"#;
        assert!(serde_yaml::from_str::<SessionConfig>(yaml).is_err());
    }

    #[test]
    fn test_validate_rejects_publish_without_broker() {
        let mut config = SessionConfig::new("a", "b");
        config.publish = true;
        assert!(config.validate().is_err());

        let config = SessionConfig::new("a", "b").with_broker("http://broker.internal:9292");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        assert!(SessionConfig::new("", "b").validate().is_err());
        assert!(SessionConfig::new("a", "").validate().is_err());
    }

    #[test]
    fn test_contract_file_name() {
        let config = SessionConfig::new("ProductServiceClient", "ProductService");
        assert_eq!(
            config.contract_file_name(),
            "ProductServiceClient-ProductService.json"
        );
    }
}
