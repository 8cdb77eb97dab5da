//! 属性宏集成测试

use component_macros::{exception_handler, service_provider};
use di_abstractions::{
    markers, ClassManifest, ContainerBuilder, Describe, ExceptionHandler, ServiceProvider,
    ServiceScopeExt,
};
use di_impl::{Environment, ServiceContainer};
use infrastructure_common::{error_types, DependencyError, InfrastructureError};
use std::sync::atomic::{AtomicUsize, Ordering};

const GREETING_TARGET: &str = "App\\Interfaces\\IGreeting";

#[derive(Debug)]
struct Greeting(String);

/// 默认构造的提供者
#[service_provider(name = "greeting", target = "App\\Interfaces\\IGreeting", priority = 2)]
#[derive(Default)]
pub struct GreetingProvider;

impl ServiceProvider for GreetingProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container.singleton_as(name, Greeting("hello".to_string()));
        Ok(())
    }
}

/// 自定义构造函数的提供者
#[service_provider(
    name = "farewell",
    target = "App\\Interfaces\\IFarewell",
    class = "App\\Providers\\FarewellProvider",
    constructor = FarewellProvider::create
)]
pub struct FarewellProvider {
    owner: String,
}

impl FarewellProvider {
    fn create(container: &dyn ContainerBuilder) -> Self {
        Self {
            owner: container.type_name().to_string(),
        }
    }
}

impl ServiceProvider for FarewellProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container.singleton_as(name, Greeting(format!("bye from {}", self.owner)));
        Ok(())
    }
}

static HANDLED: AtomicUsize = AtomicUsize::new(0);

#[exception_handler(target = error_types::MISSING_PROVIDER_ERROR, priority = -1)]
#[derive(Default)]
pub struct NotFoundHandler;

impl ExceptionHandler for NotFoundHandler {
    fn handle(
        &self,
        _error: &InfrastructureError,
        _container: Option<&dyn ContainerBuilder>,
    ) -> Result<(), InfrastructureError> {
        HANDLED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 测试宏生成的清单条目
#[test]
fn test_service_provider_describe() {
    let entry = GreetingProvider::describe();
    assert_eq!(entry.name, std::any::type_name::<GreetingProvider>());
    assert_eq!(entry.attributes.len(), 1);

    let attribute = &entry.attributes[0];
    assert_eq!(attribute.marker(), markers::SERVICE_PROVIDER);
    assert_eq!(attribute.name(), "greeting");
    assert_eq!(attribute.target(), Some(GREETING_TARGET));
    assert_eq!(attribute.priority(), 2);
    assert!(entry.factory.and_then(|factory| factory.as_provider()).is_some());
}

#[test]
fn test_custom_class_name() {
    let entry = FarewellProvider::describe();
    assert_eq!(entry.name, "App\\Providers\\FarewellProvider");
}

#[test]
fn test_exception_handler_describe() {
    let entry = NotFoundHandler::describe();
    let attribute = &entry.attributes[0];
    assert_eq!(attribute.marker(), markers::EXCEPTION_HANDLER);
    assert_eq!(attribute.target(), Some(error_types::MISSING_PROVIDER_ERROR));
    assert_eq!(attribute.priority(), -1);
    assert!(entry.factory.and_then(|factory| factory.as_exception_handler()).is_some());
}

/// 测试宏声明的类型在进程环境中解析
#[test]
fn test_macro_types_resolve_in_environment() {
    let manifest = ClassManifest::new()
        .with_type::<GreetingProvider>()
        .with_type::<FarewellProvider>()
        .with_type::<NotFoundHandler>();
    let environment = Environment::from_manifest(manifest);
    let container = environment.main_build::<ServiceContainer>();

    let greeting = container.get_as::<Greeting>("greeting").unwrap();
    assert_eq!(greeting.0, "hello");

    let farewell = container.get_as::<Greeting>("farewell").unwrap();
    assert_eq!(farewell.0, format!("bye from {}", container.type_name()));

    let error = InfrastructureError::from(DependencyError::missing_provider("router"));
    assert_eq!(environment.handle_exception(&error).unwrap(), 1);
    assert_eq!(HANDLED.load(Ordering::SeqCst), 1);
}
