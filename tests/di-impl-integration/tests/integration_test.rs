//! 服务容器与属性解析集成测试

use di_abstractions::{
    ClassEntry, ClassManifest, ContainerBuilder, ExceptionHandler, ServiceProvider, ServiceScope,
    ServiceScopeExt,
};
use di_impl::{Environment, ServiceContainer, ENVIRONMENT_TYPE, SERVICE_CONTAINER_TYPE};
use infrastructure_common::{
    error_types, CallbackError, ConfigurationError, DependencyError, InfrastructureError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CONFIGURATION_TARGET: &str = "Lorn\\Web\\Interfaces\\Configuration\\IConfigurationBuilder";

/// 测试用配置服务
#[derive(Debug)]
struct Settings {
    source: &'static str,
}

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static REGISTERED: AtomicUsize = AtomicUsize::new(0);

/// 计数的配置提供者，把服务注册到进程环境
struct CountingProvider;

impl ServiceProvider for CountingProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        REGISTERED.fetch_add(1, Ordering::SeqCst);
        container
            .environment_scope()?
            .singleton_as(name, Settings { source: "counting" });
        Ok(())
    }
}

fn counting_provider(_container: &dyn ContainerBuilder) -> Box<dyn ServiceProvider> {
    CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
    Box::new(CountingProvider)
}

/// 注册到本容器的提供者
struct LocalProvider(&'static str);

impl ServiceProvider for LocalProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container.singleton_as(name, Settings { source: self.0 });
        Ok(())
    }
}

fn json_provider(_container: &dyn ContainerBuilder) -> Box<dyn ServiceProvider> {
    Box::new(LocalProvider("json"))
}

fn ini_provider(_container: &dyn ContainerBuilder) -> Box<dyn ServiceProvider> {
    Box::new(LocalProvider("ini"))
}

/// 解析时依赖另一个服务的提供者
struct ChainProvider(&'static str);

impl ServiceProvider for ChainProvider {
    fn register(&self, container: &dyn ContainerBuilder, _name: &str) -> Result<(), DependencyError> {
        container.get_service(self.0).map(|_| ())
    }
}

fn alpha_provider(_container: &dyn ContainerBuilder) -> Box<dyn ServiceProvider> {
    Box::new(ChainProvider("beta"))
}

fn beta_provider(_container: &dyn ContainerBuilder) -> Box<dyn ServiceProvider> {
    Box::new(ChainProvider("alpha"))
}

static HANDLED: AtomicUsize = AtomicUsize::new(0);

struct CountingHandler;

impl ExceptionHandler for CountingHandler {
    fn handle(
        &self,
        _error: &InfrastructureError,
        _container: Option<&dyn ContainerBuilder>,
    ) -> Result<(), InfrastructureError> {
        HANDLED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn counting_handler() -> Box<dyn ExceptionHandler> {
    Box::new(CountingHandler)
}

fn environment(manifest: ClassManifest) -> Arc<Environment> {
    let environment = Environment::from_manifest(manifest);
    environment.main_build::<ServiceContainer>();
    environment
}

/// 测试按名称解析配置服务，提供者只构造和注册一次
#[test]
fn test_configuration_provider_registers_once() {
    let environment = environment(
        ClassManifest::new().with_entry(
            ClassEntry::new("App\\Providers\\ConfigurationBuilderProvider")
                .provides("configuration", CONFIGURATION_TARGET, 0)
                .with_provider(counting_provider),
        ),
    );
    let container = environment.get::<ServiceContainer>().unwrap();

    let first = container.get_as::<Settings>("configuration").unwrap();
    let second = container.get_as::<Settings>("configuration").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.source, "counting");
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
    assert_eq!(REGISTERED.load(Ordering::SeqCst), 1);
    assert!(environment.contains_service("configuration"));
    assert!(!container.contains_service("configuration"));
}

/// 测试缺少提供者时错误携带名称
#[test]
fn test_missing_provider_carries_name() {
    let environment = environment(ClassManifest::new());
    let container = environment.get::<ServiceContainer>().unwrap();

    let error = container.get_service("router").unwrap_err();
    assert!(matches!(error, DependencyError::MissingProvider { ref name } if name == "router"));

    let error = InfrastructureError::from(error);
    assert_eq!(error.status_code(), 404);
}

/// 测试优先级数值小的提供者胜出
#[test]
fn test_lower_priority_value_wins() {
    let environment = environment(
        ClassManifest::new()
            .with_entry(ClassEntry::new("App\\IResult").with_kind(infrastructure_common::TypeKind::Interface))
            .with_entry(
                ClassEntry::new("App\\IniProvider")
                    .provides("result", "App\\IniResult", 5)
                    .with_provider(ini_provider),
            )
            .with_entry(
                ClassEntry::new("App\\JsonProvider")
                    .provides("result", "App\\JsonResult", 1)
                    .with_provider(json_provider),
            )
            .with_entry(ClassEntry::new("App\\IniResult").extends("App\\IResult"))
            .with_entry(ClassEntry::new("App\\JsonResult").extends("App\\IResult")),
    );
    let container = environment.get::<ServiceContainer>().unwrap();

    let result = container.get_as::<Settings>("App\\IResult").unwrap();
    assert_eq!(result.source, "json");
    assert!(container.contains_service("App\\IResult"));
}

/// 测试进程环境在主容器构建前无法解析
#[test]
fn test_environment_requires_main_container() {
    let environment = Environment::from_manifest(ClassManifest::new());
    let error = environment.get_service("request").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::Configuration {
            source: ConfigurationError::MainContainerNotInitialized
        }
    ));
}

/// 测试循环解析被检测
#[test]
fn test_circular_resolution_is_detected() {
    let environment = environment(
        ClassManifest::new()
            .with_entry(
                ClassEntry::new("App\\AlphaProvider")
                    .provides("alpha", "alpha", 0)
                    .with_provider(alpha_provider),
            )
            .with_entry(
                ClassEntry::new("App\\BetaProvider")
                    .provides("beta", "beta", 0)
                    .with_provider(beta_provider),
            ),
    );
    let container = environment.get::<ServiceContainer>().unwrap();

    let error = container.get_service("alpha").unwrap_err();
    assert!(matches!(error, DependencyError::CircularResolution { .. }));

    let error = container.get_service("beta").unwrap_err();
    assert!(matches!(error, DependencyError::CircularResolution { ref chain } if chain == "beta -> alpha -> beta"));
}

/// 测试提供者缺少构造函数
#[test]
fn test_provider_without_factory_is_not_constructible() {
    let environment = environment(
        ClassManifest::new().with_entry(ClassEntry::new("App\\Broken").provides("broken", "broken", 0)),
    );
    let error = environment.get_service("broken").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::Configuration {
            source: ConfigurationError::NotConstructible { ref type_name }
        } if type_name == "App\\Broken"
    ));
}

/// 测试容器索引操作
#[test]
fn test_container_index_operations() {
    let environment = Environment::from_manifest(ClassManifest::new());
    assert!(!environment.contains_container(SERVICE_CONTAINER_TYPE));

    let first = environment.build::<ServiceContainer>();
    let second = environment.get::<ServiceContainer>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let replaced = environment.build::<ServiceContainer>();
    assert!(!Arc::ptr_eq(&first, &replaced));
    assert_eq!(environment.containers().len(), 1);

    assert!(environment.remove_container(SERVICE_CONTAINER_TYPE));
    assert!(!environment.remove_container(SERVICE_CONTAINER_TYPE));
    assert!(environment.main_container().is_none());
}

/// 测试服务移除
#[test]
fn test_remove_missing_service_returns_false() {
    let environment = environment(ClassManifest::new());
    let container = environment.get::<ServiceContainer>().unwrap();
    container.singleton_as("request", Settings { source: "manual" });

    assert!(!container.remove_service("response"));
    assert!(container.contains_service("request"));
    assert!(container.remove_service("request"));
    assert!(!container.contains_service("request"));
}

/// 测试进程环境释放后容器报错
#[test]
fn test_released_environment() {
    let environment = Environment::from_manifest(ClassManifest::new());
    let container = environment.build::<ServiceContainer>();
    drop(environment);

    let error = container.get_service("request").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::Configuration {
            source: ConfigurationError::EnvironmentReleased
        }
    ));
}

/// 测试异常处理器按目标匹配
#[test]
fn test_exception_handlers_run_by_target() {
    let environment = environment(
        ClassManifest::new()
            .with_entry(
                ClassEntry::new("App\\NotFoundHandler")
                    .handles(error_types::MISSING_PROVIDER_ERROR, 0)
                    .with_handler(counting_handler),
            )
            .with_entry(
                ClassEntry::new("App\\EnvironmentHandler")
                    .handles(ENVIRONMENT_TYPE, 1)
                    .with_handler(counting_handler),
            ),
    );

    let error = InfrastructureError::from(DependencyError::missing_provider("router"));
    let handled = environment.handle_exception(&error).unwrap();
    assert_eq!(handled, 2);
    assert_eq!(HANDLED.load(Ordering::SeqCst), 2);

    let other = InfrastructureError::BootstrapFailed {
        message: "boom".to_string(),
    };
    assert_eq!(environment.handle_exception(&other).unwrap(), 1);
}

/// 测试没有处理器工厂的处理器属性
#[test]
fn test_handler_without_factory_is_invalid_callback() {
    let environment = environment(
        ClassManifest::new()
            .with_entry(ClassEntry::new("App\\BrokenHandler").handles(ENVIRONMENT_TYPE, 0)),
    );
    let error = InfrastructureError::BootstrapFailed {
        message: "boom".to_string(),
    };
    let result = environment.handle_exception(&error);
    assert!(matches!(
        result,
        Err(InfrastructureError::CallbackError {
            source: CallbackError::InvalidCallback { ref callback }
        }) if callback == "App\\BrokenHandler"
    ));
}
