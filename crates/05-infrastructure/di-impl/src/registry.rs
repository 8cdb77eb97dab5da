//! 服务注册表实现

use di_abstractions::{ServiceInstance, ServiceRegistry};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// 服务集合
///
/// 名称到实例的映射。读写锁只在单次操作内持有，
/// 提供者在解析期间可以安全地重入。
#[derive(Default)]
pub struct ServiceCollection {
    services: RwLock<HashMap<String, ServiceInstance>>,
}

impl ServiceCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceRegistry for ServiceCollection {
    fn get(&self, name: &str) -> Option<ServiceInstance> {
        self.services.read().get(name).cloned()
    }

    fn add(&self, name: &str, instance: ServiceInstance) {
        if self.services.write().insert(name.to_string(), instance).is_some() {
            debug!("覆盖已注册的服务: {}", name);
        } else {
            debug!("注册服务: {}", name);
        }
    }

    fn remove(&self, name: &str) -> bool {
        self.services.write().remove(name).is_some()
    }

    fn contains(&self, name: &str) -> bool {
        self.services.read().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn len(&self) -> usize {
        self.services.read().len()
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("names", &self.names())
            .finish()
    }
}
