pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileContactRepository, InMemoryContactRepository, LocalStorage, ViaCepClient};
pub use app::{build_service, router, serve};
pub use config::{ConfigProvider, TomlConfig};
pub use core::ContactService;
pub use domain::{Address, Contact, ContactField};
pub use utils::error::{ContactError, Result};
