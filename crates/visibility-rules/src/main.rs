//! 可见性规则诊断工具
//!
//! 加载配置、初始化日志后执行单条诊断命令，结果以 JSON 输出到 stdout。

use anyhow::Result;
use clap::Parser;
use portal_shared::config::AppConfig;
use portal_shared::observability;
use std::sync::Arc;
use tracing::info;
use visibility_rules::AttributeRegistry;
use visibility_rules::cli::{Cli, CommandRunner};

const SERVICE_NAME: &str = "visibility-rules";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 统一加载配置：从 config/{service_name}.toml 加载
    let mut config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            ..AppConfig::default()
        }
    });
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    observability::init(&config)?;

    let registry = Arc::new(AttributeRegistry::member_portal());
    info!(attributes = registry.len(), "Attribute registry loaded");

    info!(
        policy = ?config.session.invalid_token_policy,
        "Invalid token policy configured"
    );
    let runner = CommandRunner::new(registry, &config.session)?;
    println!("{}", runner.run(&cli.command)?);

    Ok(())
}
