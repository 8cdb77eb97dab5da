//! 请求
//!
//! [`RawRequest`] 保存从 CGI 变量和标准输入捕获的原始数据，
//! [`Request`] 在其上解析出方法、路径、查询参数、请求头和输入参数。

use crate::error::HttpError;
use crate::method::Method;
use infrastructure_common::Dictionary;
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

const JSON_CONTENT_TYPE: &str = "application/json";

/// 原始请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    pub method: String,
    /// 路径与查询串，例如 `/users?id=1`
    pub uri: String,
    pub protocol: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            protocol: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// 从 CGI 变量构造
    ///
    /// `HTTP_X_FORWARDED_FOR` 还原为 `X-Forwarded-For`，
    /// `CONTENT_TYPE` 与 `CONTENT_LENGTH` 作为请求头保留
    pub fn from_cgi<I, K, V>(variables: I, body: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new("GET", "/");
        let mut path_info = None;
        let mut query_string = None;
        let mut request_uri = None;

        for (key, value) in variables {
            let key = key.as_ref();
            let value = value.into();
            match key {
                "REQUEST_METHOD" => raw.method = value,
                "REQUEST_URI" => request_uri = Some(value),
                "PATH_INFO" => path_info = Some(value),
                "QUERY_STRING" => query_string = Some(value),
                "SERVER_PROTOCOL" => raw.protocol = value,
                "CONTENT_TYPE" => raw.headers.push(("Content-Type".to_string(), value)),
                "CONTENT_LENGTH" => raw.headers.push(("Content-Length".to_string(), value)),
                _ => {
                    if let Some(name) = key.strip_prefix("HTTP_") {
                        raw.headers.push((cgi_header_name(name), value));
                    }
                }
            }
        }

        raw.uri = match request_uri {
            Some(uri) => uri,
            None => {
                let path = path_info.unwrap_or_else(|| "/".to_string());
                match query_string.filter(|query| !query.is_empty()) {
                    Some(query) => format!("{path}?{query}"),
                    None => path,
                }
            }
        };
        raw.body = body;
        raw
    }
}

fn cgi_header_name(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let lower = part.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// 解析后的请求
#[derive(Debug, Clone)]
pub struct Request {
    id: Uuid,
    method: Method,
    protocol: String,
    url: Url,
    query: Dictionary,
    headers: Dictionary,
    input: Dictionary,
    body: Vec<u8>,
}

impl Request {
    /// 解析原始请求
    ///
    /// 请求头名称转为小写；输入参数先取查询参数，再合并请求体：
    /// 内容类型为 `application/json` 时按 JSON 对象解析，否则按表单编码解析
    pub fn parse(raw: RawRequest) -> Result<Self, HttpError> {
        let method: Method = raw.method.parse()?;

        let mut headers = Dictionary::new();
        for (name, value) in &raw.headers {
            headers.add(name.to_ascii_lowercase(), value.clone());
        }

        let host = headers.get_str("host").unwrap_or("localhost");
        let base = format!("http://{host}");
        let url = Url::parse(&base)
            .and_then(|base| base.join(&raw.uri))
            .map_err(|source| HttpError::InvalidUri {
                uri: raw.uri.clone(),
                source,
            })?;

        let mut query = Dictionary::new();
        query.load_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));

        let mut input = query.clone();
        if !raw.body.is_empty() {
            let content_type = headers.get_str("content-type").map(media_type);
            if content_type == Some(JSON_CONTENT_TYPE) {
                let text = std::str::from_utf8(&raw.body).map_err(|e| HttpError::InvalidBody {
                    message: e.to_string(),
                })?;
                input.load_json_str(text).map_err(|e| HttpError::InvalidBody {
                    message: e.to_string(),
                })?;
            } else {
                input.load_pairs(
                    url::form_urlencoded::parse(&raw.body)
                        .map(|(k, v)| (k.into_owned(), v.into_owned())),
                );
            }
        }

        let request = Self {
            id: Uuid::new_v4(),
            method,
            protocol: raw.protocol,
            url,
            query,
            headers,
            input,
            body: raw.body,
        };
        debug!(
            "解析请求: {} {} {} ({})",
            request.method,
            request.path(),
            request.protocol,
            request.id
        );
        Ok(request)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn host(&self) -> Option<&str> {
        self.headers.get_str("host")
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &Dictionary {
        &self.headers
    }

    pub fn query(&self) -> &Dictionary {
        &self.query
    }

    pub fn input(&self) -> &Dictionary {
        &self.input
    }

    /// 按名称取请求头，名称不区分大小写
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get_str(&name.to_ascii_lowercase())
    }

    pub fn header_content_type(&self) -> Option<&str> {
        self.header_value("content-type")
    }

    pub fn input_value(&self, key: &str) -> Option<&Value> {
        self.input.get_value(key)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get_str(key)
    }
}

/// 去掉参数部分的媒体类型
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_and_headers() {
        let raw = RawRequest::new("get", "/users/list?page=2&sort=name")
            .with_header("Host", "example.com")
            .with_header("X-Request-Source", "cli");
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/users/list");
        assert_eq!(request.host(), Some("example.com"));
        assert_eq!(request.header_value("x-request-source"), Some("cli"));
        assert_eq!(request.header_value("X-REQUEST-SOURCE"), Some("cli"));
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.input_value("sort"), Some(&json!("name")));
        assert!(request.headers().contains_key("host"));
    }

    /// 测试 JSON 请求体合并到输入参数
    #[test]
    fn test_json_body() {
        let raw = RawRequest::new("POST", "/orders?source=web")
            .with_header("Content-Type", "application/json; charset=UTF-8")
            .with_body(json!({ "amount": 10, "source": "api" }).to_string());
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.input_value("amount"), Some(&json!(10)));
        assert_eq!(request.input_value("source"), Some(&json!("api")));
        assert_eq!(request.query_value("source"), Some("web"));
    }

    #[test]
    fn test_form_body() {
        let raw = RawRequest::new("POST", "/login")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body("user=admin&note=a+b%21");
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.input_value("user"), Some(&json!("admin")));
        assert_eq!(request.input_value("note"), Some(&json!("a b!")));
    }

    #[test]
    fn test_invalid_json_body() {
        let raw = RawRequest::new("POST", "/")
            .with_header("content-type", "application/json")
            .with_body("[1, 2]");
        assert!(matches!(Request::parse(raw), Err(HttpError::InvalidBody { .. })));
    }

    /// 测试从 CGI 变量还原请求
    #[test]
    fn test_from_cgi_variables() {
        let raw = RawRequest::from_cgi(
            [
                ("REQUEST_METHOD", "PUT"),
                ("PATH_INFO", "/items/7"),
                ("QUERY_STRING", "force=1"),
                ("HTTP_HOST", "api.local"),
                ("HTTP_X_FORWARDED_FOR", "10.0.0.1"),
                ("CONTENT_TYPE", "application/json"),
                ("SERVER_PROTOCOL", "HTTP/1.0"),
                ("PATH", "/usr/bin"),
            ],
            br#"{"name":"lamp"}"#.to_vec(),
        );

        assert_eq!(raw.uri, "/items/7?force=1");
        assert_eq!(raw.protocol, "HTTP/1.0");
        assert!(raw
            .headers
            .contains(&("X-Forwarded-For".to_string(), "10.0.0.1".to_string())));
        assert_eq!(raw.headers.len(), 3);

        let request = Request::parse(raw).unwrap();
        assert_eq!(request.method(), Method::Put);
        assert_eq!(request.host(), Some("api.local"));
        assert_eq!(request.input_value("name"), Some(&json!("lamp")));
        assert_eq!(request.input_value("force"), Some(&json!("1")));
    }
}
