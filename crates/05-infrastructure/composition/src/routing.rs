//! 路由接口
//!
//! 路由由应用提供，容器只负责在执行时取出路由集合并执行匹配的路由。

use crate::containers::WebContainer;
use infrastructure_common::InfrastructureError;
use std::sync::Arc;
use web_http::ResultBuilder;

/// 路由集合
pub trait RoutingCollection: Send + Sync {
    /// 按当前请求匹配路由
    fn match_request(&self, container: &WebContainer) -> Result<Arc<dyn Route>, InfrastructureError>;
}

/// 单个路由
pub trait Route: Send + Sync {
    fn execute(&self, container: &WebContainer) -> Result<ResultBuilder, InfrastructureError>;
}

/// 注册在服务集合中的路由集合
pub type SharedRouting = Arc<dyn RoutingCollection>;
