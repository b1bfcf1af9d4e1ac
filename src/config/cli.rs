use crate::config::TomlConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "contact-registry.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-registry")]
#[command(about = "REST service for contacts with postal code address enrichment")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub bind: Option<String>,

    /// Path prefix for the contact routes
    #[arg(long)]
    pub base_path: Option<String>,

    /// Base URL of the ViaCEP-compatible lookup service
    #[arg(long)]
    pub lookup_url: Option<String>,

    /// Storage backend: memory or file
    #[arg(long)]
    pub storage: Option<String>,

    /// JSON file used by the file storage backend
    #[arg(long)]
    pub data_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔，未指定且預設檔不存在時使用預設值
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                TomlConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(base_path) = &self.base_path {
            config.server.base_path = base_path.clone();
        }
        if let Some(url) = &self.lookup_url {
            config.lookup.base_url = url.clone();
        }
        if let Some(storage) = &self.storage {
            config.storage.backend = Some(storage.clone());
        }
        if let Some(path) = &self.data_file {
            config.storage.path = Some(path.clone());
            config.storage.backend.get_or_insert_with(|| "file".to_string());
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.format = Some("json".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigProvider, StorageBackend};
    use crate::utils::logger::LogFormat;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = CliConfig::parse_from([
            "contact-registry",
            "--bind",
            "0.0.0.0:3000",
            "--lookup-url",
            "http://localhost:7000",
            "--data-file",
            "/tmp/contacts.json",
            "--json-logs",
        ]);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.lookup_base_url(), "http://localhost:7000");
        assert_eq!(
            config.storage_backend().unwrap(),
            StorageBackend::File(PathBuf::from("/tmp/contacts.json"))
        );
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.base_path(), "/api/contacts");
    }

    #[test]
    fn test_explicit_storage_flag_wins_over_data_file() {
        let cli = CliConfig::parse_from([
            "contact-registry",
            "--storage",
            "memory",
            "--data-file",
            "/tmp/contacts.json",
        ]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Memory);
    }
}
