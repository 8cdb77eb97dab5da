//! 依赖注入容器抽象接口
//!
//! 提供服务作用域和容器的核心抽象

use infrastructure_common::{ConfigurationError, DependencyError};
use std::any::Any;
use std::sync::Arc;

/// 服务实例
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 服务作用域 trait
///
/// 容器和进程环境都实现该接口。所有方法接收 `&self`，
/// 以便提供者在解析过程中重入。
pub trait ServiceScope: Send + Sync {
    /// 获取服务，不存在时通过服务提供者解析
    fn get_service(&self, name: &str) -> Result<ServiceInstance, DependencyError>;

    /// 注册单例，同名服务被覆盖
    fn singleton(&self, name: &str, instance: ServiceInstance);

    /// 移除服务，不存在时返回 `false`
    fn remove_service(&self, name: &str) -> bool;

    /// 是否已持有服务，不触发解析
    fn contains_service(&self, name: &str) -> bool;
}

/// 容器 trait
pub trait ContainerBuilder: ServiceScope {
    /// 容器类型名称，用于容器索引和异常处理器匹配
    fn type_name(&self) -> &str;

    /// 进程环境作用域
    fn environment_scope(&self) -> Result<Arc<dyn ServiceScope>, ConfigurationError>;
}

/// 带类型转换的服务访问
pub trait ServiceScopeExt: ServiceScope {
    /// 获取服务并转换为具体类型
    fn get_as<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        self.get_service(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 以具体类型注册单例
    fn singleton_as<T>(&self, name: &str, instance: T)
    where
        T: Any + Send + Sync,
    {
        self.singleton(name, Arc::new(instance));
    }
}

impl<S: ServiceScope + ?Sized> ServiceScopeExt for S {}
