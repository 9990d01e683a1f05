//! 统一可观测性模块
//!
//! 提供 logging 与 metrics 描述的统一初始化。
//! 所有二进制通过单一入口点配置可观测性，确保一致的日志格式和指标命名。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::AppConfig;

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. Metrics（指标描述，exporter 由宿主服务安装）
///
/// # Example
///
/// ```ignore
/// use portal_shared::{config::AppConfig, observability};
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("visibility-rules")?;
///     observability::init(&config)?;
///     Ok(())
/// }
/// ```
pub fn init(config: &AppConfig) -> Result<()> {
    tracing::init(&config.observability)?;
    metrics::describe();

    info!(
        service = %config.service_name,
        environment = %config.environment,
        log_format = %config.observability.log_format,
        "Observability initialized"
    );

    Ok(())
}
