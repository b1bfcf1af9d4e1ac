#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn base_path(&self) -> &str;
    fn lookup_base_url(&self) -> &str;
    fn lookup_timeout(&self) -> Option<Duration>;
    fn storage_backend(&self) -> Result<StorageBackend>;
    fn verbose(&self) -> bool;
    fn log_format(&self) -> LogFormat;
}
