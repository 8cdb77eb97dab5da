//! 响应
//!
//! 响应对象作为服务注册在进程环境中，由多个调用方共享，
//! 状态保存在读写锁内。

use crate::error::HttpError;
use crate::header::{names, Header};
use crate::result::ResultBuilder;
use crate::status::StatusCode;
use infrastructure_common::Dictionary;
use parking_lot::RwLock;
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct ResponseState {
    status: StatusCode,
    headers: Dictionary,
    result: Option<ResultBuilder>,
}

/// HTTP 响应
#[derive(Debug, Default)]
pub struct Response {
    state: RwLock<ResponseState>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status_code(&self, status: impl Into<StatusCode>) {
        self.state.write().status = status.into();
    }

    pub fn status_code(&self) -> StatusCode {
        self.state.read().status
    }

    pub fn has_status_code(&self, status: impl Into<StatusCode>) -> bool {
        self.state.read().status == status.into()
    }

    pub fn set_result(&self, result: impl Into<ResultBuilder>) {
        self.state.write().result = Some(result.into());
    }

    pub fn result(&self) -> Option<ResultBuilder> {
        self.state.read().result.clone()
    }

    pub fn headers(&self) -> Dictionary {
        self.state.read().headers.clone()
    }

    /// 批量添加响应头，同名头被覆盖
    pub fn add_headers<I, K, V>(&self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut state = self.state.write();
        for (name, value) in headers {
            let value: String = value.into();
            state.headers.add(name, value);
        }
    }

    pub fn add_header(&self, name: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.state.write().headers.add(name, value);
    }

    pub fn header(&self, name: &str) -> Option<Header> {
        let state = self.state.read();
        state
            .headers
            .get_str(name)
            .map(|value| Header::new(name, value))
    }

    pub fn contains_header(&self, name: &str) -> bool {
        self.state.read().headers.contains_key(name)
    }

    pub fn remove_header(&self, name: &str) -> bool {
        self.state.write().headers.remove(name)
    }

    pub fn set_content_type(&self, content_type: impl Into<String>) {
        self.add_header(names::CONTENT_TYPE, content_type);
    }

    /// 重定向到路由，路由名中的 `_` 转换为路径分隔符
    ///
    /// `status` 缺省为 301
    pub fn set_redirect(&self, route_name: &str, status: Option<StatusCode>) {
        let location = format!("/{}", route_name.replace('_', "/"));
        debug!("重定向: {}", location);
        self.add_header(names::LOCATION, location);
        self.set_status_code(status.unwrap_or(StatusCode::MOVED_PERMANENTLY));
    }

    /// 设置下载文件名
    ///
    /// 文件名按引号字符串转义，控制字符（含 CR、LF）被丢弃
    pub fn set_content_disposition(&self, filename: &str) {
        self.add_header(
            names::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", quote_filename(filename)),
        );
    }

    /// 输出响应：状态行、响应头、空行、响应体
    ///
    /// 存在响应结果时，`Content-Type` 由结果的内容类型和字符集决定
    pub fn write_to<W: Write>(&self, protocol: &str, writer: &mut W) -> Result<(), HttpError> {
        if let Some(result) = self.result() {
            self.set_content_type(result.content_type_header());
        }

        let state = self.state.read();
        write!(writer, "{}\r\n", state.status.status_line(protocol))?;
        for (name, value) in state.headers.iter() {
            match value.as_str() {
                Some(value) => write!(writer, "{}\r\n", Header::new(name.as_str(), value))?,
                None => write!(writer, "{}: {}\r\n", name, value)?,
            }
        }
        writer.write_all(b"\r\n")?;
        if let Some(result) = &state.result {
            writer.write_all(result.content())?;
        }
        writer.flush()?;
        debug!("输出响应: {}", state.status);
        Ok(())
    }
}

fn quote_filename(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars().filter(|c| !c.is_control()) {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}
