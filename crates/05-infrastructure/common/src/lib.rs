//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn Web 基础设施层的公共类型和错误定义。
//!
//! ## 核心组件
//!
//! - [`AttributeRecord`] - 属性标记记录
//! - [`TypeCatalog`] - 类型继承关系目录
//! - [`Dictionary`] - 字符串键到 JSON 值的字典
//! - [`InfrastructureError`] - 基础设施错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 显式的类型清单替代运行时反射
//! - 错误在发现处抛出，由最外层边界统一处理

pub mod catalog;
pub mod dictionary;
pub mod errors;
pub mod metadata;

pub use catalog::*;
pub use dictionary::*;
pub use errors::*;
pub use metadata::*;
