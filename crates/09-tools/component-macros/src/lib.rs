//! # Component Macros
//!
//! 为结构体生成 `di_abstractions::Describe` 实现，把类型声明的属性写入类型清单。
//!
//! ## 核心宏
//!
//! - [`service_provider`] - 声明服务提供者
//! - [`exception_handler`] - 声明异常处理器
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::service_provider;
//!
//! #[derive(Default)]
//! #[service_provider(name = "request", target = "Lorn\\Web\\Interfaces\\Http\\IHttpRequest", priority = 0)]
//! pub struct HttpRequestProvider;
//! ```

use proc_macro::TokenStream;

mod handler;
mod provider;
mod utils;

/// 服务提供者宏
///
/// # 参数
///
/// - `name = "..."` - 服务名称（必需）
/// - `target = "..."` - 目标类型（必需）
/// - `priority = N` - 优先级，数值小者优先（默认为 0）
/// - `class = "..."` - 清单中的类型名称（默认为 Rust 类型路径）
/// - `constructor = path` - 构造函数 `fn(&dyn ContainerBuilder) -> Self`，缺省时使用 `Default`
#[proc_macro_attribute]
pub fn service_provider(args: TokenStream, input: TokenStream) -> TokenStream {
    provider::service_provider_impl(args, input)
}

/// 异常处理器宏
///
/// # 参数
///
/// - `target = "..."` - 处理的类型（必需）
/// - `priority = N` - 优先级（默认为 0）
/// - `class = "..."` - 清单中的类型名称
/// - `constructor = path` - 构造函数 `fn() -> Self`，缺省时使用 `Default`
#[proc_macro_attribute]
pub fn exception_handler(args: TokenStream, input: TokenStream) -> TokenStream {
    handler::exception_handler_impl(args, input)
}
