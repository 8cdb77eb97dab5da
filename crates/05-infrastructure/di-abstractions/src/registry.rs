//! 服务注册表抽象接口

use crate::container::ServiceInstance;

/// 服务注册表 trait
///
/// 名称到实例的映射，每个名称至多一个实例
pub trait ServiceRegistry: Send + Sync {
    /// 获取实例
    fn get(&self, name: &str) -> Option<ServiceInstance>;

    /// 添加实例，同名实例被覆盖
    fn add(&self, name: &str, instance: ServiceInstance);

    /// 移除实例，不存在时返回 `false`
    fn remove(&self, name: &str) -> bool;

    /// 是否包含实例
    fn contains(&self, name: &str) -> bool;

    /// 已注册的名称
    fn names(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
