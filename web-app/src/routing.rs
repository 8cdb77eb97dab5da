//! 回显路由
//!
//! 把请求方法、路径和输入参数原样返回

use component_macros::service_provider;
use di_abstractions::{ContainerBuilder, ServiceProvider, ServiceScopeExt};
use infrastructure_common::{DependencyError, InfrastructureError};
use infrastructure_composition::{interfaces, Route, RoutingCollection, SharedRouting, WebContainer};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use web_http::ResultBuilder;

#[derive(Debug)]
struct EchoRoute;

impl Route for EchoRoute {
    fn execute(&self, container: &WebContainer) -> Result<ResultBuilder, InfrastructureError> {
        let request = container.http_request()?;
        debug!("回显请求 {} {}", request.method(), request.path());
        Ok(ResultBuilder::json(&json!({
            "id": request.id().to_string(),
            "method": request.method(),
            "path": request.path(),
            "input": request.input(),
        }))?)
    }
}

#[derive(Debug)]
struct EchoRouting;

impl RoutingCollection for EchoRouting {
    fn match_request(&self, _container: &WebContainer) -> Result<Arc<dyn Route>, InfrastructureError> {
        Ok(Arc::new(EchoRoute))
    }
}

/// 路由提供者
#[service_provider(
    name = "routing",
    target = interfaces::ROUTING_COLLECTION,
    class = "App\\Providers\\EchoRoutingProvider"
)]
#[derive(Debug, Default)]
pub struct EchoRoutingProvider;

impl ServiceProvider for EchoRoutingProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        let routing: SharedRouting = Arc::new(EchoRouting);
        container.singleton_as(name, routing);
        Ok(())
    }
}
