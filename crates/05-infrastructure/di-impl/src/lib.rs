//! # 依赖注入具体实现
//!
//! 提供源码扫描、属性发现、属性索引、服务解析、服务容器和进程环境的具体实现。
//!
//! ## 启动流程
//!
//! 1. [`SourceScanner`] 词法扫描源码目录，建立类型索引
//! 2. [`ManifestDiscovery`] 按扫描顺序从类型清单中收集属性
//! 3. [`AttributeCollection`] 按优先级稳定排序
//! 4. [`Environment`] 持有以上结果并构建容器
//! 5. [`ServiceContainer`] 首次访问服务时通过 [`AttributeProviderResolver`] 解析

pub mod attribute_index;
pub mod container;
pub mod discovery;
pub mod environment;
pub mod lexer;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use attribute_index::{AttributeCollection, FilteredCollection};
pub use container::{ContainerType, ServiceContainer, SERVICE_CONTAINER_TYPE};
pub use discovery::ManifestDiscovery;
pub use environment::{ContainerIndex, Environment, ENVIRONMENT_TYPE};
pub use registry::ServiceCollection;
pub use resolver::AttributeProviderResolver;
pub use scanner::{extract_type_names, ClassLoader, SourceScanner};
