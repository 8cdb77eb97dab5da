//! Web 容器与异常容器

use crate::names::interfaces;
use crate::routing::SharedRouting;
use configuration::ConfigurationBuilder;
use di_abstractions::{ContainerBuilder, ServiceInstance, ServiceScope, ServiceScopeExt};
use di_impl::{ContainerType, Environment, ServiceContainer};
use infrastructure_common::{
    ConfigurationError, DependencyError, InfrastructureError, InfrastructureResult,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use web_http::{Request, Response, ResultBuilder};

/// Web 容器类型名称
pub const WEB_CONTAINER_TYPE: &str = "Lorn\\Web\\Container\\WebContainer";
/// 异常容器类型名称
pub const EXCEPTION_CONTAINER_TYPE: &str = "Lorn\\Web\\Container\\ExceptionContainer";

/// Web 容器
///
/// 应用的主容器，执行路由并把结果写入响应
#[derive(Debug)]
pub struct WebContainer {
    base: ServiceContainer,
}

impl WebContainer {
    pub fn environment(&self) -> Result<Arc<Environment>, ConfigurationError> {
        self.base.environment()
    }

    pub fn http_request(&self) -> Result<Arc<Request>, DependencyError> {
        self.get_as(interfaces::HTTP_REQUEST)
    }

    pub fn http_response(&self) -> Result<Arc<Response>, DependencyError> {
        self.get_as(interfaces::HTTP_RESPONSE)
    }

    pub fn configuration(&self) -> Result<Arc<ConfigurationBuilder>, DependencyError> {
        self.get_as(interfaces::CONFIGURATION_BUILDER)
    }

    pub fn routing(&self) -> Result<SharedRouting, DependencyError> {
        let routing = self.get_as::<SharedRouting>(interfaces::ROUTING_COLLECTION)?;
        Ok(Arc::clone(&routing))
    }

    /// 匹配路由并执行，返回响应结果
    pub fn execute_result(&self) -> InfrastructureResult<ResultBuilder> {
        let routing = self.routing()?;
        let route = routing.match_request(self)?;
        route.execute(self)
    }

    /// 执行路由并把结果写入响应
    pub fn execute_response(&self) -> InfrastructureResult<()> {
        let response = self.http_response()?;
        let result = self.execute_result()?;
        response.set_result(result);
        info!("请求执行完成: {}", response.status_code());
        Ok(())
    }
}

impl ServiceScope for WebContainer {
    fn get_service(&self, name: &str) -> Result<ServiceInstance, DependencyError> {
        self.base.get_service_in(self, name)
    }

    fn singleton(&self, name: &str, instance: ServiceInstance) {
        self.base.singleton(name, instance);
    }

    fn remove_service(&self, name: &str) -> bool {
        self.base.remove_service(name)
    }

    fn contains_service(&self, name: &str) -> bool {
        self.base.contains_service(name)
    }
}

impl ContainerBuilder for WebContainer {
    fn type_name(&self) -> &str {
        self.base.type_name()
    }

    fn environment_scope(&self) -> Result<Arc<dyn ServiceScope>, ConfigurationError> {
        self.base.environment_scope()
    }
}

impl ContainerType for WebContainer {
    const TYPE_NAME: &'static str = WEB_CONTAINER_TYPE;

    fn create(base: ServiceContainer) -> Self {
        Self { base }
    }
}

/// 错误报告，异常容器以 JSON 形式输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: u16,
    pub error: String,
    pub message: String,
}

impl ErrorReport {
    pub fn from_error(error: &InfrastructureError) -> Self {
        Self {
            code: error.status_code(),
            error: error.type_name().to_string(),
            message: error.to_string(),
        }
    }
}

/// 异常容器
///
/// 持有错误和出错时的主容器，把错误报告写入响应
pub struct ExceptionContainer {
    base: ServiceContainer,
    report: RwLock<Option<ErrorReport>>,
    main: RwLock<Option<Arc<dyn ContainerBuilder>>>,
}

impl ExceptionContainer {
    pub fn set_error(&self, error: &InfrastructureError) {
        *self.report.write() = Some(ErrorReport::from_error(error));
    }

    pub fn set_main_container(&self, container: Arc<dyn ContainerBuilder>) {
        *self.main.write() = Some(container);
    }

    pub fn report(&self) -> Option<ErrorReport> {
        self.report.read().clone()
    }

    pub fn error_code(&self) -> Option<u16> {
        self.report.read().as_ref().map(|report| report.code)
    }

    pub fn error_message(&self) -> Option<String> {
        self.report.read().as_ref().map(|report| report.message.clone())
    }

    pub fn main_container(&self) -> Option<Arc<dyn ContainerBuilder>> {
        self.main.read().clone()
    }

    pub fn http_request(&self) -> Result<Arc<Request>, DependencyError> {
        self.get_as(interfaces::HTTP_REQUEST)
    }

    pub fn http_response(&self) -> Result<Arc<Response>, DependencyError> {
        self.get_as(interfaces::HTTP_RESPONSE)
    }

    /// 通过主容器获取应用配置
    pub fn configuration(&self) -> Result<Arc<ConfigurationBuilder>, DependencyError> {
        let main = self
            .main_container()
            .ok_or(ConfigurationError::MainContainerNotInitialized)?;
        main.get_as(interfaces::CONFIGURATION_BUILDER)
    }

    /// 把错误报告写入响应，状态码取自错误
    pub fn execute_response(&self) -> InfrastructureResult<()> {
        let report = self
            .report()
            .ok_or_else(|| InfrastructureError::BootstrapFailed {
                message: "异常容器未设置错误".to_string(),
            })?;
        let response = self.http_response()?;
        response.set_status_code(report.code);
        response.set_result(ResultBuilder::json(&report)?);
        debug!("输出错误报告: {} {}", report.code, report.error);
        Ok(())
    }
}

impl ServiceScope for ExceptionContainer {
    fn get_service(&self, name: &str) -> Result<ServiceInstance, DependencyError> {
        self.base.get_service_in(self, name)
    }

    fn singleton(&self, name: &str, instance: ServiceInstance) {
        self.base.singleton(name, instance);
    }

    fn remove_service(&self, name: &str) -> bool {
        self.base.remove_service(name)
    }

    fn contains_service(&self, name: &str) -> bool {
        self.base.contains_service(name)
    }
}

impl ContainerBuilder for ExceptionContainer {
    fn type_name(&self) -> &str {
        self.base.type_name()
    }

    fn environment_scope(&self) -> Result<Arc<dyn ServiceScope>, ConfigurationError> {
        self.base.environment_scope()
    }
}

impl ContainerType for ExceptionContainer {
    const TYPE_NAME: &'static str = EXCEPTION_CONTAINER_TYPE;

    fn create(base: ServiceContainer) -> Self {
        Self {
            base,
            report: RwLock::new(None),
            main: RwLock::new(None),
        }
    }
}

impl std::fmt::Debug for ExceptionContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionContainer")
            .field("base", &self.base)
            .field("report", &*self.report.read())
            .finish()
    }
}
