//! 类型扫描器抽象接口
//!
//! 提供对源码目录进行词法扫描、建立类型索引的能力

use infrastructure_common::ConfigurationError;
use std::path::{Path, PathBuf};

/// 类型扫描器 trait
///
/// 扫描只做词法分析，不执行任何源码
pub trait TypeScanner: Send + Sync {
    /// 扫描目录，返回新登记的类型数量
    fn scan(&self, root: &Path) -> Result<usize, ConfigurationError>;

    /// 按完全限定名查找声明文件
    fn lookup(&self, type_name: &str) -> Option<PathBuf>;

    /// 按登记顺序返回全部类型名称
    fn type_names(&self) -> Vec<String>;

    /// 已登记的类型数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 参与扫描的文件扩展名
    pub extensions: Vec<String>,
    /// 排除的路径模式（glob，相对扫描根目录），默认不排除
    pub exclude_patterns: Vec<String>,
    /// 是否跟随符号链接
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["php".to_string()],
            exclude_patterns: Vec::new(),
            follow_links: false,
        }
    }
}

impl ScanOptions {
    /// 设置文件扩展名
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// 添加排除模式
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// 设置是否跟随符号链接
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// 文件扩展名是否参与扫描
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(extension))
            })
    }
}
