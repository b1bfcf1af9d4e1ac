use crate::adapters::DEFAULT_VIACEP_URL;
use crate::app::DEFAULT_BASE_PATH;
use crate::config::{ConfigProvider, StorageBackend};
use crate::utils::error::{ContactError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern must compile"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    pub format: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_lookup_url() -> String {
    DEFAULT_VIACEP_URL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            base_path: default_base_path(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_url(),
            timeout_seconds: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ContactError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIACEP_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn storage_backend_kind(&self) -> Result<StorageBackend> {
        match self.storage.backend.as_deref().unwrap_or("memory") {
            "memory" => Ok(StorageBackend::Memory),
            "file" => {
                let path = validation::validate_required_field("storage.path", &self.storage.path)?;
                validation::validate_path("storage.path", path)?;
                Ok(StorageBackend::File(path.into()))
            }
            other => Err(ContactError::InvalidConfigValueError {
                field: "storage.backend".to_string(),
                value: other.to_string(),
                reason: "Unsupported backend. Valid backends: memory, file".to_string(),
            }),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;
        validation::validate_route_prefix("server.base_path", &self.server.base_path)?;
        validation::validate_url("lookup.base_url", &self.lookup.base_url)?;

        if let Some(timeout) = self.lookup.timeout_seconds {
            validation::validate_positive_number("lookup.timeout_seconds", timeout, 1)?;
        }

        self.storage_backend_kind()?;

        if let Some(format) = &self.logging.format {
            if LogFormat::parse(format).is_none() {
                return Err(ContactError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: "Unsupported format. Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind_address
    }

    fn base_path(&self) -> &str {
        &self.server.base_path
    }

    fn lookup_base_url(&self) -> &str {
        &self.lookup.base_url
    }

    fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup.timeout_seconds.map(Duration::from_secs)
    }

    fn storage_backend(&self) -> Result<StorageBackend> {
        self.storage_backend_kind()
    }

    fn verbose(&self) -> bool {
        self.logging.verbose
    }

    fn log_format(&self) -> LogFormat {
        self.logging
            .format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.base_path(), "/api/contacts");
        assert_eq!(config.lookup_base_url(), "https://viacep.com.br");
        assert!(config.lookup_timeout().is_none());
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Memory);
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_full_config_parses() {
        let config = TomlConfig::from_toml_str(
            r#"
[server]
bind_address = "0.0.0.0:9090"
base_path = "/contacts"

[lookup]
base_url = "http://localhost:7000"
timeout_seconds = 5

[storage]
backend = "file"
path = "./data/contacts.json"

[logging]
verbose = true
format = "json"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.lookup_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.storage_backend().unwrap(),
            StorageBackend::File(PathBuf::from("./data/contacts.json"))
        );
        assert!(config.verbose());
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_env_vars_are_substituted() {
        std::env::set_var("CONTACT_REGISTRY_TEST_LOOKUP", "http://lookup.internal:8000");
        let config = TomlConfig::from_toml_str(
            r#"
[lookup]
base_url = "${CONTACT_REGISTRY_TEST_LOOKUP}"
"#,
        )
        .unwrap();
        assert_eq!(config.lookup.base_url, "http://lookup.internal:8000");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file_without_path = TomlConfig::from_toml_str("[storage]\nbackend = \"file\"").unwrap();
        assert!(matches!(
            file_without_path.validate(),
            Err(ContactError::MissingConfigError { .. })
        ));

        let bad_backend = TomlConfig::from_toml_str("[storage]\nbackend = \"redis\"").unwrap();
        assert!(bad_backend.validate().is_err());

        let bad_timeout = TomlConfig::from_toml_str("[lookup]\ntimeout_seconds = 0").unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[logging]\nformat = \"xml\"").unwrap();
        assert!(bad_format.validate().is_err());

        assert!(TomlConfig::from_toml_str("[server\n").is_err());
    }
}
