//! # 启动组合层
//!
//! 把源码扫描、属性发现、进程环境和 Web 容器组合成可以处理一次请求的应用。
//!
//! ## 主要功能
//!
//! - **启动器**: 扫描源码目录、创建唯一的进程环境
//! - **容器**: [`WebContainer`] 执行路由，[`ExceptionContainer`] 输出错误报告
//! - **内置提供者**: 应用配置、请求、响应
//! - **日志**: 按启动配置初始化 `tracing`
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use configuration::AppSettings;
//! use infrastructure_composition::Bootstrapper;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bootstrapper = Bootstrapper::new(AppSettings::load(None)?);
//!     bootstrapper.initialize()?;
//!
//!     let mut stdout = std::io::stdout();
//!     if let Err(e) = bootstrapper.run(&mut stdout) {
//!         bootstrapper.render_failure(&e, &mut stdout)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod containers;
pub mod handlers;
pub mod names;
pub mod logging;
pub mod providers;
pub mod routing;

#[cfg(test)]
mod tests;

pub use bootstrapper::Bootstrapper;
pub use containers::{
    ErrorReport, ExceptionContainer, WebContainer, EXCEPTION_CONTAINER_TYPE, WEB_CONTAINER_TYPE,
};
pub use handlers::LoggingExceptionHandler;
pub use names::{interfaces, services};
pub use logging::{initialize_logging, LoggingConfig};
pub use providers::{
    builtin_manifest, ConfigurationBuilderProvider, HttpRequestProvider, HttpResponseProvider,
};
pub use routing::{Route, RoutingCollection, SharedRouting};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
