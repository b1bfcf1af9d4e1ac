use clap::Parser;
use contact_registry::utils::{logger, validation::Validate};
use contact_registry::{CliConfig, ConfigProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定並套用命令列覆蓋
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        eprintln!("❌ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    logger::init_logger(config.verbose(), config.log_format());

    tracing::info!("Starting contact-registry");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = contact_registry::serve(&config).await {
        tracing::error!("❌ Server failed: {} (kind: {})", e, e.kind());
        return Err(e.into());
    }

    Ok(())
}
