//! 日志初始化

use configuration::LoggingSettings;
use infrastructure_common::InfrastructureError;
use std::str::FromStr;
use tracing::{info, warn};

/// 日志配置
///
/// 由启动配置的 `logging.level` 和 `logging.json` 决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否输出源码文件和行号
    pub show_source: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_source: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：DEBUG 级别，带源码位置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_source: true,
            json_format: false,
        }
    }

    /// 生产环境：INFO 级别，JSON 格式
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_source: false,
            json_format: true,
        }
    }

    /// 由启动配置创建，无法识别的级别按 INFO 处理
    ///
    /// DEBUG 及更详细的级别输出源码位置
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let level = tracing::Level::from_str(&settings.level).unwrap_or_else(|_| {
            warn!("无法识别的日志级别: {}", settings.level);
            tracing::Level::INFO
        });
        let base = if settings.json {
            Self::production()
        } else if level >= tracing::Level::DEBUG {
            Self::development()
        } else {
            Self::default()
        };
        Self {
            level,
            show_source: level >= tracing::Level::DEBUG,
            ..base
        }
    }
}

/// 初始化日志系统
///
/// 日志写入标准错误，标准输出保留给 HTTP 响应
pub fn initialize_logging(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.level)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
