//! Configuration module
//!
//! Loads connection profiles from a TOML file. Each profile names the two
//! service endpoints, the compartment jobs are created in and optional
//! credentials:
//!
//! ```toml
//! [profiles.DEFAULT]
//! endpoint = "https://document.example.com"
//! object_storage_endpoint = "https://objectstorage.example.com"
//! compartment_id = "ocid1.compartment.example"
//! auth_token = "secret"
//! request_timeout_secs = 30
//! ```

use anyhow::{Context, Result};
use directories::BaseDirs;
use docjob_client::ClientConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the profile used when none is given
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Connection settings for one account
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Base URL of the document service
    pub endpoint: String,
    /// Base URL of the object store holding results
    pub object_storage_endpoint: String,
    /// Compartment new jobs are created in
    pub compartment_id: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Profile {
    /// Client settings for the document service
    pub fn document_client_config(&self) -> ClientConfig {
        self.client_config(&self.endpoint)
    }

    /// Client settings for the object store
    pub fn object_storage_client_config(&self) -> ClientConfig {
        self.client_config(&self.object_storage_endpoint)
    }

    fn client_config(&self, endpoint: &str) -> ClientConfig {
        let mut config = ClientConfig::new(endpoint);
        if let Some(token) = &self.auth_token {
            config = config.with_auth_token(token.clone());
        }
        if let Some(secs) = self.request_timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("endpoint must not be empty");
        }
        if self.object_storage_endpoint.trim().is_empty() {
            anyhow::bail!("object_storage_endpoint must not be empty");
        }
        if self.compartment_id.trim().is_empty() {
            anyhow::bail!("compartment_id must not be empty");
        }
        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        Ok(())
    }
}

/// Contents of a config file
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl ConfigFile {
    /// Parse a config file from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config file")
    }

    /// Read and parse the config file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Look up a profile by name and validate it
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        let profile = self.profiles.get(name).with_context(|| {
            let mut known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
            known.sort_unstable();
            format!(
                "Profile '{}' not found (available: {})",
                name,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            )
        })?;
        profile
            .validate()
            .with_context(|| format!("Invalid profile '{}'", name))?;
        Ok(profile)
    }
}

/// `~/.docjob/config.toml`, if a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".docjob").join("config.toml"))
}

/// Load profile `name` from `path`, or from the default location
pub fn load_profile(path: Option<&Path>, name: &str) -> Result<Profile> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()
            .context("Could not determine home directory; pass --config")?,
    };
    let file = ConfigFile::load(&path)?;
    Ok(file.profile(name)?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[profiles.DEFAULT]
endpoint = "https://document.example.com"
object_storage_endpoint = "https://objectstorage.example.com"
compartment_id = "ocid1.compartment.default"

[profiles.staging]
endpoint = "https://document.staging.example.com"
object_storage_endpoint = "https://objectstorage.staging.example.com"
compartment_id = "ocid1.compartment.staging"
auth_token = "s3cret"
request_timeout_secs = 15
"#;

    #[test]
    fn test_load_profile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let profile = load_profile(Some(file.path()), "staging").unwrap();
        assert_eq!(profile.compartment_id, "ocid1.compartment.staging");

        let docs = profile.document_client_config();
        assert_eq!(docs.endpoint, "https://document.staging.example.com");
        assert_eq!(docs.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(docs.request_timeout, Some(Duration::from_secs(15)));

        let objects = profile.object_storage_client_config();
        assert_eq!(objects.endpoint, "https://objectstorage.staging.example.com");
    }

    #[test]
    fn test_default_profile_has_no_credentials() {
        let file = ConfigFile::parse(SAMPLE).unwrap();
        let profile = file.profile(DEFAULT_PROFILE).unwrap();
        let config = profile.document_client_config();
        assert!(config.auth_token.is_none());
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_unknown_profile_lists_available() {
        let file = ConfigFile::parse(SAMPLE).unwrap();
        let err = file.profile("prod").unwrap_err().to_string();
        assert!(err.contains("prod"));
        assert!(err.contains("DEFAULT, staging"));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let file = ConfigFile::parse(
            r#"
[profiles.DEFAULT]
endpoint = ""
object_storage_endpoint = "https://objectstorage.example.com"
compartment_id = "c"
"#,
        )
        .unwrap();
        assert!(file.profile(DEFAULT_PROFILE).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        assert!(load_profile(Some(&missing), DEFAULT_PROFILE).is_err());
    }
}
