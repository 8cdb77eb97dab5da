//! 应用配置
//!
//! 从 INI 格式的 `.env` 文件读取配置项。分节的键展开为 `节.键` 形式，
//! 未分节的键保持原样，因此 `app.debug = 1` 与 `[app] debug = 1` 等价。

use config::FileFormat;
use infrastructure_common::{ConfigurationError, Dictionary};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 调试开关的配置键
pub const DEBUG_KEY: &str = "app.debug";

/// 应用配置
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    path: PathBuf,
    values: Dictionary,
}

impl ConfigurationBuilder {
    /// 加载配置文件，文件不存在或无法解析时返回错误
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let location = path.display().to_string();
        if !path.is_file() {
            error!("配置文件不存在: {}", location);
            return Err(ConfigurationError::SettingsLoad {
                path: location,
                message: "文件不存在".to_string(),
            });
        }

        let settings = config::Config::builder()
            .add_source(config::File::new(&location, FileFormat::Ini))
            .build()
            .and_then(|settings| settings.try_deserialize::<Map<String, Value>>())
            .map_err(|e| {
                error!("配置文件解析失败: {}: {}", location, e);
                ConfigurationError::SettingsLoad {
                    path: location.clone(),
                    message: e.to_string(),
                }
            })?;

        let mut values = Dictionary::new();
        flatten_into(&mut values, None, settings);
        debug!("加载配置文件: {} ({} 项)", location, values.len());

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// 由已有配置项创建
    pub fn from_dictionary(values: Dictionary) -> Self {
        Self {
            path: PathBuf::new(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &Dictionary {
        &self.values
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get_value(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get_str(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// 调试开关是否等于 `expected`，未配置时视为开启
    pub fn is_debugging(&self, expected: bool) -> bool {
        let debug = self.get_value(DEBUG_KEY).map_or(true, is_truthy);
        debug == expected
    }

    pub fn is_development(&self) -> bool {
        self.is_debugging(true)
    }

    pub fn is_production(&self) -> bool {
        self.is_debugging(false)
    }
}

/// 按 INI 习惯判断真假值
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no" | "none"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(items) => !items.is_empty(),
    }
}

fn flatten_into(values: &mut Dictionary, prefix: Option<&str>, items: Map<String, Value>) {
    for (key, value) in items {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(values, Some(&key), nested),
            other => values.add(key, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_load_sections_and_plain_keys() {
        let file = env_file("app.name = lorn\n\n[database]\nhost = localhost\nport = 5432\n");
        let configuration = ConfigurationBuilder::load(file.path()).unwrap();

        assert_eq!(configuration.get_str("app.name"), Some("lorn"));
        assert_eq!(configuration.get_str("database.host"), Some("localhost"));
        assert!(configuration.contains_key("database.port"));
        assert!(configuration.get_value("database").is_none());
    }

    /// 测试未配置调试开关时视为开发环境
    #[test]
    fn test_debug_defaults_to_development() {
        let configuration = ConfigurationBuilder::from_dictionary(Dictionary::new());
        assert!(configuration.is_development());
        assert!(!configuration.is_production());
    }

    #[test]
    fn test_debug_switch() {
        let file = env_file("[app]\ndebug = off\n");
        let configuration = ConfigurationBuilder::load(file.path()).unwrap();
        assert!(configuration.is_production());
        assert!(configuration.is_debugging(false));

        let mut values = Dictionary::new();
        values.add(DEBUG_KEY, "1");
        assert!(ConfigurationBuilder::from_dictionary(values).is_development());
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigurationBuilder::load("/nonexistent/.env");
        assert!(matches!(
            result,
            Err(ConfigurationError::SettingsLoad { ref path, .. }) if path == "/nonexistent/.env"
        ));
    }
}
