//! 服务容器实现

use crate::environment::Environment;
use crate::registry::ServiceCollection;
use di_abstractions::{ContainerBuilder, ServiceInstance, ServiceRegistry, ServiceScope};
use infrastructure_common::{ConfigurationError, DependencyError};
use std::sync::{Arc, Weak};
use tracing::debug;

/// 基础容器类型名称
pub const SERVICE_CONTAINER_TYPE: &str = "Lorn\\Web\\Container\\ContainerBuilder";

/// 可由进程环境构建的容器类型
pub trait ContainerType: ContainerBuilder + Sized + 'static {
    /// 容器类型名称，容器索引以此为键
    const TYPE_NAME: &'static str;

    /// 基于基础容器创建
    fn create(base: ServiceContainer) -> Self;
}

/// 服务容器
///
/// 持有自己的服务集合，通过弱引用访问进程环境。
/// 查找顺序：进程环境 → 本容器 → 解析 → 进程环境 → 本容器。
pub struct ServiceContainer {
    type_name: String,
    services: ServiceCollection,
    environment: Weak<Environment>,
}

impl ServiceContainer {
    /// 创建容器
    pub fn new(type_name: impl Into<String>, environment: Weak<Environment>) -> Self {
        Self {
            type_name: type_name.into(),
            services: ServiceCollection::new(),
            environment,
        }
    }

    /// 所属进程环境
    pub fn environment(&self) -> Result<Arc<Environment>, ConfigurationError> {
        self.environment
            .upgrade()
            .ok_or(ConfigurationError::EnvironmentReleased)
    }

    /// 本容器的服务集合
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// 以 `container` 作为提供者参数获取服务
    ///
    /// 包装容器以自身调用，使提供者拿到最外层容器
    pub fn get_service_in(
        &self,
        container: &dyn ContainerBuilder,
        name: &str,
    ) -> Result<ServiceInstance, DependencyError> {
        let environment = self.environment()?;
        if let Some(instance) = environment.services().get(name) {
            return Ok(instance);
        }
        if let Some(instance) = self.services.get(name) {
            return Ok(instance);
        }

        debug!("容器 {} 中未找到服务 {}，开始解析", self.type_name, name);
        environment.resolver().resolve(container, name)?;

        environment
            .services()
            .get(name)
            .or_else(|| self.services.get(name))
            .ok_or_else(|| DependencyError::ServiceNotRegistered {
                name: name.to_string(),
            })
    }
}

impl ServiceScope for ServiceContainer {
    fn get_service(&self, name: &str) -> Result<ServiceInstance, DependencyError> {
        self.get_service_in(self, name)
    }

    fn singleton(&self, name: &str, instance: ServiceInstance) {
        self.services.add(name, instance);
    }

    fn remove_service(&self, name: &str) -> bool {
        self.services.remove(name)
    }

    fn contains_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }
}

impl ContainerBuilder for ServiceContainer {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn environment_scope(&self) -> Result<Arc<dyn ServiceScope>, ConfigurationError> {
        Ok(self.environment()? as Arc<dyn ServiceScope>)
    }
}

impl ContainerType for ServiceContainer {
    const TYPE_NAME: &'static str = SERVICE_CONTAINER_TYPE;

    fn create(base: ServiceContainer) -> Self {
        base
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("type_name", &self.type_name)
            .field("services", &self.services)
            .finish()
    }
}
