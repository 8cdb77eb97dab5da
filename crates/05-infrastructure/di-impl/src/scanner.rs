//! 源码扫描器与类型加载器

use crate::lexer::{Lexer, Token};
use di_abstractions::{ScanOptions, TypeScanner};
use infrastructure_common::ConfigurationError;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 类型索引
#[derive(Debug, Default)]
struct TypeIndex {
    /// 登记顺序
    order: Vec<String>,
    /// 完全限定名到文件
    paths: HashMap<String, PathBuf>,
    /// 已扫描的文件
    files: HashSet<PathBuf>,
}

/// 源码扫描器
///
/// 递归遍历源码目录，对每个文件做词法分析，记录 `完全限定名 -> 文件路径`。
/// 同一文件在扫描器的生命周期内只登记一次。
#[derive(Debug)]
pub struct SourceScanner {
    options: ScanOptions,
    exclude: Vec<glob::Pattern>,
    index: RwLock<TypeIndex>,
}

impl SourceScanner {
    /// 创建扫描器，无效的排除模式会被忽略
    pub fn new(options: ScanOptions) -> Self {
        let exclude = options
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("忽略无效的排除模式 {}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            options,
            exclude,
            index: RwLock::new(TypeIndex::default()),
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// 扫描单个文件，返回新登记的类型数量
    ///
    /// 文件不可读时返回 0
    pub fn scan_file(&self, path: &Path) -> usize {
        let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.index.read().files.contains(&canonical) {
            return 0;
        }

        let source = match std::fs::read_to_string(&canonical) {
            Ok(source) => source,
            Err(e) => {
                debug!("跳过不可读文件 {}: {}", canonical.display(), e);
                return 0;
            }
        };

        let declared = extract_type_names(&source);
        let mut index = self.index.write();
        if !index.files.insert(canonical.clone()) {
            return 0;
        }

        let mut added = 0;
        for type_name in declared {
            if let Some(existing) = index.paths.get(&type_name) {
                warn!(
                    "类型 {} 已在 {} 中声明，忽略 {}",
                    type_name,
                    existing.display(),
                    canonical.display()
                );
                continue;
            }
            index.paths.insert(type_name.clone(), canonical.clone());
            index.order.push(type_name);
            added += 1;
        }
        added
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl TypeScanner for SourceScanner {
    fn scan(&self, root: &Path) -> Result<usize, ConfigurationError> {
        std::fs::read_dir(root).map_err(|_| ConfigurationError::SourceUnreadable {
            path: root.display().to_string(),
        })?;

        info!("开始扫描源码目录: {}", root.display());
        let mut added = 0;
        let entries = WalkDir::new(root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            if !self.options.accepts_extension(path) {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.is_excluded(relative) {
                debug!("排除文件: {}", relative.display());
                continue;
            }
            added += self.scan_file(path);
        }

        info!("源码扫描完成，新增 {} 个类型，共 {} 个", added, self.len());
        Ok(added)
    }

    fn lookup(&self, type_name: &str) -> Option<PathBuf> {
        self.index
            .read()
            .paths
            .get(type_name.trim_start_matches('\\'))
            .cloned()
    }

    fn type_names(&self) -> Vec<String> {
        self.index.read().order.clone()
    }

    fn len(&self) -> usize {
        self.index.read().order.len()
    }
}

/// 提取源码中声明的类型完全限定名
///
/// 文件中第一个命名空间生效；`Foo::class`、`new class`、`$x->class` 不是声明
pub fn extract_type_names(source: &str) -> Vec<String> {
    let tokens = Lexer::new(source).tokenize();
    let mut namespace: Option<String> = None;
    let mut names = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if token.is_keyword("namespace") {
            if namespace.is_none() {
                if let Some(Token::Identifier(name)) = tokens.get(position + 1) {
                    namespace = Some(name.trim_matches('\\').to_string());
                }
            }
            continue;
        }

        if !["class", "interface", "trait"]
            .iter()
            .any(|keyword| token.is_keyword(keyword))
        {
            continue;
        }

        let previous = position.checked_sub(1).and_then(|index| tokens.get(index));
        let is_reference = match previous {
            Some(Token::DoubleColon) | Some(Token::Symbol('>')) => true,
            Some(previous) => previous.is_keyword("new"),
            None => false,
        };
        if is_reference {
            continue;
        }

        let Some(Token::Identifier(simple_name)) = tokens.get(position + 1) else {
            continue;
        };
        if simple_name.contains('\\')
            || simple_name.eq_ignore_ascii_case("extends")
            || simple_name.eq_ignore_ascii_case("implements")
        {
            continue;
        }

        names.push(match namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}\\{simple_name}"),
            _ => simple_name.clone(),
        });
    }

    names
}

/// 类型加载器
///
/// 按类型名称从扫描索引中定位文件，每个文件只读取一次
#[derive(Debug)]
pub struct ClassLoader {
    scanner: Arc<SourceScanner>,
    loaded: RwLock<HashMap<PathBuf, Arc<str>>>,
}

impl ClassLoader {
    pub fn new(scanner: Arc<SourceScanner>) -> Self {
        Self {
            scanner,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn scanner(&self) -> &Arc<SourceScanner> {
        &self.scanner
    }

    /// 加载类型所在文件
    pub fn load(&self, type_name: &str) -> Result<Arc<str>, ConfigurationError> {
        let path = self
            .scanner
            .lookup(type_name)
            .ok_or_else(|| ConfigurationError::TypeNotFound {
                type_name: type_name.to_string(),
            })?;

        if let Some(source) = self.loaded.read().get(&path) {
            return Ok(Arc::clone(source));
        }

        let source: Arc<str> = std::fs::read_to_string(&path)
            .map_err(|_| ConfigurationError::FileNotReadable {
                path: path.display().to_string(),
            })?
            .into();

        debug!("加载类型 {} 于 {}", type_name, path.display());
        let mut loaded = self.loaded.write();
        Ok(Arc::clone(loaded.entry(path).or_insert(source)))
    }

    /// 类型所在文件是否已加载
    pub fn is_loaded(&self, type_name: &str) -> bool {
        self.scanner
            .lookup(type_name)
            .is_some_and(|path| self.loaded.read().contains_key(&path))
    }

    /// 已加载的文件数量
    pub fn loaded_files(&self) -> usize {
        self.loaded.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_uses_first_namespace() {
        let names = extract_type_names(
            r"<?php
            namespace App\Providers;
            interface IThing {}
            trait Helper {}
            final class Thing implements IThing {}
            namespace Other;
            class Late {}
            ",
        );
        assert_eq!(
            names,
            vec![
                "App\\Providers\\IThing",
                "App\\Providers\\Helper",
                "App\\Providers\\Thing",
                "App\\Providers\\Late",
            ]
        );
    }

    #[test]
    fn test_extract_skips_references() {
        let names = extract_type_names(
            r"<?php
            class Real {
                public function make() {
                    $name = Real::class;
                    $other = $this->class;
                    return new class(1) extends Real {};
                }
            }
            ",
        );
        assert_eq!(names, vec!["Real"]);
    }

    /// 测试结束标记后的文本中的引号不会吞掉后续声明
    #[test]
    fn test_extract_after_inline_text() {
        let names = extract_type_names("<?php namespace App; ?>\n<p>Don't panic</p>\n<?php class Real {}\n");
        assert_eq!(names, vec!["App\\Real"]);
    }

    #[test]
    fn test_scan_mixed_template_file() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::write(
            root.path().join("page.php"),
            "<html><?php namespace App\\View; ?>\n<p>It's a \"class Fake\" page</p>\n<?php final class Page {} ?>\n</html>\n",
        )
        .unwrap();

        let scanner = SourceScanner::default();
        assert_eq!(scanner.scan(root.path()).unwrap(), 1);
        assert!(scanner.lookup("App\\View\\Page").is_some());
        assert!(scanner.lookup("App\\View\\Fake").is_none());
    }
}
