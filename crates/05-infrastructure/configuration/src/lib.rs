//! # Configuration
//!
//! 启动配置 [`AppSettings`] 与应用 `.env` 配置 [`ConfigurationBuilder`]。

pub mod builder;
pub mod settings;

pub use builder::*;
pub use settings::*;
