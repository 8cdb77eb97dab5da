//! 响应结果

use crate::error::HttpError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 默认内容类型
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
/// 默认字符集
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// 响应结果
///
/// 内容按原始字节保存，文本和二进制资源都原样输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBuilder {
    content: Vec<u8>,
    content_type: String,
    charset: Option<String>,
}

impl ResultBuilder {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            charset: Some(DEFAULT_CHARSET.to_string()),
        }
    }

    /// 序列化为 JSON 结果
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, HttpError> {
        serde_json::to_string(value)
            .map(Self::new)
            .map_err(|e| HttpError::InvalidBody {
                message: e.to_string(),
            })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// 不输出字符集
    pub fn without_charset(mut self) -> Self {
        self.charset = None;
        self
    }

    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = Some(charset.into());
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// 内容为合法 UTF-8 时返回文本
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// `Content-Type` 头的值，带字符集后缀
    pub fn content_type_header(&self) -> String {
        match &self.charset {
            Some(charset) if !charset.is_empty() => {
                format!("{}; charset={}", self.content_type, charset)
            }
            _ => self.content_type.clone(),
        }
    }
}

impl fmt::Display for ResultBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.content))
    }
}

/// 文件资源结果
///
/// 读取文件内容并按扩展名推断内容类型
#[derive(Debug, Clone)]
pub struct ResourceResult {
    path: PathBuf,
    result: ResultBuilder,
}

impl ResourceResult {
    /// 读取资源文件，`remove_after` 为真时读取后删除文件
    pub fn open(path: impl AsRef<Path>, remove_after: bool) -> Result<Self, HttpError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| HttpError::ResourceNotReadable {
            path: path.display().to_string(),
            source,
        })?;

        debug!("读取资源: {} ({} 字节)", path.display(), bytes.len());
        let mut result = ResultBuilder::new(bytes);
        if let Some(content_type) = guess_content_type(path) {
            result.set_content_type(content_type);
            if !is_text_content_type(content_type) {
                result = result.without_charset();
            }
        }

        if remove_after {
            if let Err(e) = fs::remove_file(path) {
                warn!("删除资源文件失败: {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            result,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn result(&self) -> &ResultBuilder {
        &self.result
    }

    pub fn into_result(self) -> ResultBuilder {
        self.result
    }
}

impl From<ResourceResult> for ResultBuilder {
    fn from(resource: ResourceResult) -> Self {
        resource.result
    }
}

/// 按扩展名推断内容类型
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "html" | "htm" => "text/html",
        "txt" | "log" => "text/plain",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(content_type)
}

/// 内容类型是否为文本，只有文本类型带字符集
pub fn is_text_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type.starts_with("text/")
        || media_type.ends_with("+xml")
        || media_type.ends_with("+json")
        || matches!(
            media_type.as_str(),
            "application/json" | "application/xml" | "application/javascript"
        )
}
