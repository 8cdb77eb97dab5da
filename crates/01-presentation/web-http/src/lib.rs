//! # Web HTTP
//!
//! 请求与响应包装：方法、状态码、请求头、请求解析、响应结果与响应输出。

pub mod error;
pub mod header;
pub mod method;
pub mod request;
pub mod response;
pub mod result;
pub mod status;

pub use error::*;
pub use header::*;
pub use method::*;
pub use request::*;
pub use response::*;
pub use result::*;
pub use status::*;
