//! 促销规则目录检查工具
//!
//! 加载规则目录并输出解析后的表单约束或展示值。

use anyhow::{Context, Result};
use clap::Parser;
use promo_shared::config::AppConfig;
use promo_shared::observability;
use promotion_rules::RuleCatalog;
use promotion_rules::cli::{Cli, execute};
use tracing::{debug, info};

const SERVICE_NAME: &str = "rule-resolver";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config_dir {
        Some(dir) => AppConfig::load_from(dir, SERVICE_NAME),
        None => AppConfig::load(SERVICE_NAME),
    }
    .unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // 命令行参数优先于配置文件
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    observability::init(&config.observability)?;

    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone().into());
    debug!(environment = %config.environment, catalog = %catalog_path.display(), "Starting {}", SERVICE_NAME);

    let catalog = RuleCatalog::from_path(&catalog_path)
        .with_context(|| format!("加载规则目录失败: {}", catalog_path.display()))?;
    info!(entries = catalog.len(), "Catalog ready");

    let output = execute(&cli.command, &catalog)?;
    println!("{}", output);
    Ok(())
}
