//! 服务提供者抽象接口

use crate::container::ContainerBuilder;
use infrastructure_common::DependencyError;

/// 服务提供者 trait
///
/// 解析器在冷解析时构造提供者，并且只调用一次 `register`。
/// 提供者负责把名为 `name` 的服务放入容器或进程环境。
pub trait ServiceProvider: Send + Sync {
    /// 注册服务
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError>;
}
