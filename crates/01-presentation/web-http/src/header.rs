//! 请求头与响应头

use std::fmt;

/// 常用头名称
pub mod names {
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_CHARSET: &str = "Accept-Charset";
    pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
    pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
    pub const ACCEPT_RANGES: &str = "Accept-Ranges";
    pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const HOST: &str = "Host";
    pub const LOCATION: &str = "Location";
}

/// 单个头字段
///
/// `response_code` 为 0 表示不改变响应状态码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
    response_code: u16,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            response_code: 0,
        }
    }

    pub fn with_response_code(mut self, code: u16) -> Self {
        self.response_code = code;
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_response_code(&mut self, code: u16) {
        self.response_code = code;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn response_code(&self) -> u16 {
        self.response_code
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_display() {
        let mut header = Header::new(names::LOCATION, "/home").with_response_code(302);
        assert_eq!(header.to_string(), "Location: /home");
        assert_eq!(header.response_code(), 302);

        header.set_value("/login");
        assert_eq!(header.value(), "/login");
    }
}
