//! 启动配置
//!
//! 配置来源按顺序叠加：`config/app.toml`（可选）、显式指定的配置文件、
//! 以 `LORN` 为前缀的环境变量（层级分隔符为 `__`）。

use di_abstractions::{DiscoveryOptions, ScanOptions};
use infrastructure_common::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 默认配置文件（不含扩展名）
pub const DEFAULT_SETTINGS_FILE: &str = "config/app";
/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN";

/// 启动配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 源码根目录，未设置时不扫描
    pub source_root: Option<PathBuf>,
    /// 应用 `.env` 文件路径
    pub env_file: PathBuf,
    /// 响应使用的 HTTP 协议版本
    pub protocol: String,
    pub scan: ScanSettings,
    pub logging: LoggingSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            source_root: None,
            env_file: PathBuf::from(".env"),
            protocol: "HTTP/1.1".to_string(),
            scan: ScanSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// 扫描配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub follow_links: bool,
    /// 跳过名称中带 `Interface`、`Trait`、`Attribute` 的类型
    pub legacy_name_filter: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let options = ScanOptions::default();
        Self {
            extensions: options.extensions,
            exclude_patterns: options.exclude_patterns,
            follow_links: options.follow_links,
            legacy_name_filter: DiscoveryOptions::default().legacy_name_filter,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppSettings {
    /// 加载启动配置
    ///
    /// `path` 指定的文件必须存在，默认配置文件可以缺省
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_SETTINGS_FILE).required(false));
        if let Some(path) = path {
            debug!("加载启动配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let location = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());
        let settings = builder.build().map_err(|e| {
            error!("启动配置构建失败: {}", e);
            ConfigurationError::SettingsLoad {
                path: location.clone(),
                message: e.to_string(),
            }
        })?;

        settings.try_deserialize().map_err(|e| {
            error!("启动配置绑定失败: {}", e);
            ConfigurationError::SettingsLoad {
                path: location,
                message: e.to_string(),
            }
        })
    }

    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// 转换为扫描选项
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.scan.extensions.clone(),
            exclude_patterns: self.scan.exclude_patterns.clone(),
            follow_links: self.scan.follow_links,
        }
    }

    /// 转换为发现选项
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::default().with_legacy_name_filter(self.scan.legacy_name_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.env_file, PathBuf::from(".env"));
        assert_eq!(settings.protocol, "HTTP/1.1");
        assert_eq!(settings.scan_options().extensions, vec!["php".to_string()]);
        assert!(settings.discovery_options().legacy_name_filter);
    }

    /// 测试从 TOML 文件加载，未出现的字段取默认值
    #[test]
    fn test_load_explicit_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
source_root = "src"
env_file = "config/.env"

[scan]
extensions = ["php", "inc"]
legacy_name_filter = false

[logging]
level = "debug"
"#
        )
        .unwrap();

        let settings = AppSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.source_root, Some(PathBuf::from("src")));
        assert_eq!(settings.env_file, PathBuf::from("config/.env"));
        assert_eq!(settings.scan.extensions, vec!["php", "inc"]);
        assert!(!settings.discovery_options().legacy_name_filter);
        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.json);
        assert_eq!(settings.protocol, "HTTP/1.1");
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = AppSettings::load(Some(Path::new("/nonexistent/lorn-settings.toml")));
        assert!(matches!(result, Err(ConfigurationError::SettingsLoad { .. })));
    }
}
