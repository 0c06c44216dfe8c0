//! Backend configuration descriptor.
//!
//! The CLI and config loader live outside this crate; they deserialize a
//! [`BackendConfig`] and hand it over. `open()` is the only way in — it
//! validates the descriptor and delegates to the factory.

use serde::Deserialize;

use crate::backend::{from_location, ExternalStorage};

fn default_max_concurrent() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Backend location, e.g. `local:///data/backups` or `s3://bucket/prefix`.
    pub url: String,
    /// Upper bound on parallel transfer workers, where the backend tool
    /// supports parallelism.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Extra arguments passed verbatim to the backend tool (endpoint,
    /// credentials file, region). Never interpreted here.
    #[serde(default)]
    pub args: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_concurrent: default_max_concurrent(),
            args: String::new(),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.url.is_empty() {
            anyhow::bail!("backend url must not be empty");
        }
        if self.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be positive");
        }
        Ok(())
    }

    /// Validate and construct the backend adapter this descriptor names.
    pub fn open(&self) -> anyhow::Result<Box<dyn ExternalStorage>> {
        self.validate()?;
        let store = from_location(&self.url, self.max_concurrent, &self.args)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BackendConfig = toml::from_str(r#"url = "local:///data/backups""#).unwrap();
        assert_eq!(config.url, "local:///data/backups");
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.args, "");
    }

    #[test]
    fn test_deserialize_full() {
        let config: BackendConfig = toml::from_str(
            r#"
            url = "s3://bucket/prefix"
            max_concurrent = 8
            args = "--endpoint-url http://minio:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.args, "--endpoint-url http://minio:9000");
    }

    #[test]
    fn test_open_dispatches_to_factory() {
        let store = BackendConfig::new("local:///data/backups").open().unwrap();
        assert_eq!(store.uri(), "local:///data/backups");
    }

    #[test]
    fn test_open_rejects_invalid() {
        assert!(BackendConfig::new("").open().is_err());

        let mut config = BackendConfig::new("local:///data/backups");
        config.max_concurrent = 0;
        assert!(config.open().is_err());

        assert!(BackendConfig::new("ftp://host/path").open().is_err());
    }
}
