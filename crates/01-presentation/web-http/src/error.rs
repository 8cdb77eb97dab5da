//! HTTP 错误类型

use infrastructure_common::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("不支持的请求方法: {method}")]
    UnknownMethod { method: String },

    #[error("无效的请求地址: {uri}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("无效的请求体: {message}")]
    InvalidBody { message: String },

    #[error("资源不可读: {path}")]
    ResourceNotReadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("响应写入失败: {source}")]
    Write {
        #[from]
        source: std::io::Error,
    },
}

impl HttpError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownMethod { .. } => 405,
            Self::InvalidUri { .. } | Self::InvalidBody { .. } => 400,
            Self::ResourceNotReadable { .. } => 404,
            Self::Write { .. } => 500,
        }
    }
}

impl From<HttpError> for InfrastructureError {
    fn from(error: HttpError) -> Self {
        InfrastructureError::RequestFailed {
            status: error.status_code(),
            message: error.to_string(),
        }
    }
}
