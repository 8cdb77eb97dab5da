//! 内置服务提供者
//!
//! 配置、请求、响应三个服务都注册到进程环境，所有容器共享同一实例。

use crate::containers::{EXCEPTION_CONTAINER_TYPE, WEB_CONTAINER_TYPE};
use crate::handlers::LoggingExceptionHandler;
use crate::names::{interfaces, services};
use component_macros::service_provider;
use configuration::{AppSettings, ConfigurationBuilder};
use di_abstractions::{ClassEntry, ClassManifest, ContainerBuilder, ServiceProvider, ServiceScopeExt};
use di_impl::SERVICE_CONTAINER_TYPE;
use infrastructure_common::{DependencyError, TypeKind};
use std::path::PathBuf;
use tracing::debug;
use web_http::{RawRequest, Request, Response};

/// 应用配置提供者
///
/// `.env` 路径取自启动配置，未注册启动配置时使用当前目录下的 `.env`
#[service_provider(
    name = "configuration",
    target = interfaces::CONFIGURATION_BUILDER,
    class = "Lorn\\Web\\Providers\\ConfigurationBuilderProvider"
)]
#[derive(Debug, Default)]
pub struct ConfigurationBuilderProvider;

impl ServiceProvider for ConfigurationBuilderProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        let environment = container.environment_scope()?;
        let env_file = if environment.contains_service(services::SETTINGS) {
            environment
                .get_as::<AppSettings>(services::SETTINGS)?
                .env_file
                .clone()
        } else {
            PathBuf::from(".env")
        };

        let configuration = ConfigurationBuilder::load(&env_file)?;
        debug!("注册应用配置: {}", env_file.display());
        environment.singleton_as(name, configuration);
        Ok(())
    }
}

/// 请求提供者
///
/// 解析启动器登记的原始请求，没有原始请求时使用 `GET /`
#[service_provider(
    name = "request",
    target = interfaces::HTTP_REQUEST,
    class = "Lorn\\Web\\Providers\\HttpRequestProvider"
)]
#[derive(Debug, Default)]
pub struct HttpRequestProvider;

impl ServiceProvider for HttpRequestProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        let environment = container.environment_scope()?;
        let raw = if environment.contains_service(services::RAW_REQUEST) {
            environment
                .get_as::<RawRequest>(services::RAW_REQUEST)?
                .as_ref()
                .clone()
        } else {
            RawRequest::new("GET", "/")
        };

        let request =
            Request::parse(raw).map_err(|e| DependencyError::registration_failed(name, e.to_string()))?;
        environment.singleton_as(name, request);
        Ok(())
    }
}

/// 响应提供者
#[service_provider(
    name = "response",
    target = interfaces::HTTP_RESPONSE,
    class = "Lorn\\Web\\Providers\\HttpResponseProvider"
)]
#[derive(Debug, Default)]
pub struct HttpResponseProvider;

impl ServiceProvider for HttpResponseProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container
            .environment_scope()?
            .singleton_as(name, Response::new());
        Ok(())
    }
}

/// 内置类型清单：接口、容器类型、内置提供者和异常处理器
pub fn builtin_manifest() -> ClassManifest {
    let mut manifest = ClassManifest::new();
    for interface in interfaces::ALL {
        manifest.register(ClassEntry::new(interface).with_kind(TypeKind::Interface));
    }
    manifest.register(
        ClassEntry::new(WEB_CONTAINER_TYPE)
            .extends(SERVICE_CONTAINER_TYPE)
            .extends(interfaces::WEB_CONTAINER),
    );
    manifest.register(
        ClassEntry::new(EXCEPTION_CONTAINER_TYPE)
            .extends(SERVICE_CONTAINER_TYPE)
            .extends(interfaces::EXCEPTION_BUILDER),
    );
    manifest
        .with_type::<ConfigurationBuilderProvider>()
        .with_type::<HttpRequestProvider>()
        .with_type::<HttpResponseProvider>()
        .with_type::<LoggingExceptionHandler>()
}
