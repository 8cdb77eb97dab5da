//! 异常处理器抽象接口

use crate::container::ContainerBuilder;
use infrastructure_common::InfrastructureError;

/// 异常处理器 trait
///
/// 由进程环境在最外层错误边界按优先级依次调用
pub trait ExceptionHandler: Send + Sync {
    /// 处理错误，主容器尚未构建时 `container` 为 `None`
    fn handle(
        &self,
        error: &InfrastructureError,
        container: Option<&dyn ContainerBuilder>,
    ) -> Result<(), InfrastructureError>;
}
