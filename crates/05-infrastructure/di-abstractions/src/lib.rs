//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义属性驱动的服务注册和解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`AttributeBuilder`] - 属性标记接口
//! - [`ClassManifest`] - 类型清单
//! - [`ServiceProvider`] - 服务提供者接口
//! - [`ServiceRegistry`] - 服务注册表接口
//! - [`TypeScanner`] - 类型扫描器接口
//! - [`ServiceResolver`] - 服务解析器接口
//! - [`ContainerBuilder`] - 容器接口

pub mod attribute;
pub mod container;
pub mod discovery;
pub mod factory;
pub mod handler;
pub mod manifest;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use attribute::*;
pub use container::*;
pub use discovery::*;
pub use factory::*;
pub use handler::*;
pub use manifest::*;
pub use provider::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
