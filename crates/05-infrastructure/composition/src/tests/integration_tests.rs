//! 启动器、Web 容器与异常容器集成测试

use crate::bootstrapper::Bootstrapper;
use crate::containers::{ExceptionContainer, WebContainer};
use crate::names::interfaces;
use crate::routing::{Route, RoutingCollection, SharedRouting};
use component_macros::service_provider;
use configuration::AppSettings;
use di_abstractions::{ContainerBuilder, ServiceProvider, ServiceScope, ServiceScopeExt, TypeScanner};
use infrastructure_common::{
    error_types, ConfigurationError, DependencyError, InfrastructureError,
};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::sync::{Arc, Once};
use tempfile::{NamedTempFile, TempDir};
use web_http::{RawRequest, ResultBuilder};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

/// 回显请求路径和输入参数的路由
struct EchoRoute;

impl Route for EchoRoute {
    fn execute(&self, container: &WebContainer) -> Result<ResultBuilder, InfrastructureError> {
        let request = container.http_request()?;
        Ok(ResultBuilder::json(&json!({
            "path": request.path(),
            "input": request.input(),
        }))?)
    }
}

struct EchoRouting;

impl RoutingCollection for EchoRouting {
    fn match_request(&self, _container: &WebContainer) -> Result<Arc<dyn Route>, InfrastructureError> {
        Ok(Arc::new(EchoRoute))
    }
}

#[service_provider(
    name = "routing",
    target = interfaces::ROUTING_COLLECTION,
    class = "App\\Providers\\RoutingProvider"
)]
#[derive(Default)]
struct RoutingProvider;

impl ServiceProvider for RoutingProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        let routing: SharedRouting = Arc::new(EchoRouting);
        container.singleton_as(name, routing);
        Ok(())
    }
}

const GREETER: &str = "App\\Interfaces\\IGreeter";

#[service_provider(name = "greeter", target = GREETER, class = "App\\Providers\\AlphaProvider")]
#[derive(Default)]
struct AlphaProvider;

#[service_provider(name = "greeter", target = GREETER, class = "App\\Providers\\ZetaProvider")]
#[derive(Default)]
struct ZetaProvider;

impl ServiceProvider for AlphaProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container.singleton_as(name, "alpha".to_string());
        Ok(())
    }
}

impl ServiceProvider for ZetaProvider {
    fn register(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        container.singleton_as(name, "zeta".to_string());
        Ok(())
    }
}

/// 登记顺序与文件名顺序相反的启动器
fn greeter_bootstrapper(settings: AppSettings) -> Bootstrapper {
    Bootstrapper::new(settings)
        .with_type::<ZetaProvider>()
        .with_type::<AlphaProvider>()
}

fn first_greeter_class(bootstrapper: &Bootstrapper) -> Option<String> {
    let environment = bootstrapper.environment().unwrap();
    let mut providers = environment.attributes().get_service_providers();
    providers.filter_by_subtype_of_target(GREETER);
    providers
        .first()
        .and_then(|record| record.class().map(str::to_string))
}

fn env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn bootstrapper(env: &NamedTempFile, raw: RawRequest) -> Bootstrapper {
    Bootstrapper::new(AppSettings::default().with_env_file(env.path()))
        .with_type::<RoutingProvider>()
        .with_raw_request(raw)
}

/// 测试完整请求：路由结果写入响应并输出
#[test]
fn test_run_writes_routed_response() {
    init_test_logger();
    let env = env_file("[app]\ndebug = 1\n");
    let raw = RawRequest::new("POST", "/greet?lang=en")
        .with_header("Content-Type", "application/json")
        .with_body(json!({ "name": "lorn" }).to_string());
    let bootstrapper = bootstrapper(&env, raw);
    bootstrapper.initialize().unwrap();

    let mut output = Vec::new();
    bootstrapper.run(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(output.contains("Content-Type: application/json; charset=UTF-8\r\n"));
    let body = output.split("\r\n\r\n").nth(1).unwrap();
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(body["path"], "/greet");
    assert_eq!(body["input"]["name"], "lorn");
    assert_eq!(body["input"]["lang"], "en");
}

/// 测试进程环境只能初始化一次
#[test]
fn test_environment_initializes_once() {
    let env = env_file("");
    let bootstrapper = bootstrapper(&env, RawRequest::new("GET", "/"));

    assert!(matches!(
        bootstrapper.environment(),
        Err(ConfigurationError::EnvironmentNotInitialized)
    ));
    let environment = bootstrapper.initialize().unwrap();
    assert!(Arc::ptr_eq(&environment, &bootstrapper.environment().unwrap()));
    assert!(matches!(
        bootstrapper.initialize(),
        Err(ConfigurationError::EnvironmentAlreadyInitialized)
    ));
}

/// 测试缺少路由时输出 404 错误报告
#[test]
fn test_missing_routing_renders_not_found() {
    init_test_logger();
    let env = env_file("");
    let bootstrapper = Bootstrapper::new(AppSettings::default().with_env_file(env.path()));
    bootstrapper.initialize().unwrap();

    let mut output = Vec::new();
    let failure = bootstrapper.run(&mut output).unwrap_err();
    assert_eq!(failure.status_code(), 404);
    assert!(output.is_empty());

    bootstrapper.render_failure(&failure, &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with("HTTP/1.1 404 Not Found\r\n"));

    let body = output.split("\r\n\r\n").nth(1).unwrap();
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(body["code"], 404);
    assert_eq!(body["error"], error_types::MISSING_PROVIDER_ERROR);
    assert!(body["message"].as_str().unwrap().contains(interfaces::ROUTING_COLLECTION));
}

/// 测试应用配置通过主容器解析
#[test]
fn test_configuration_is_resolved_from_env_file() {
    let env = env_file("[app]\nname = lorn\ndebug = off\n");
    let bootstrapper = bootstrapper(&env, RawRequest::new("GET", "/"));
    let environment = bootstrapper.initialize().unwrap();
    let container = environment.main_build::<WebContainer>();

    let configuration = container.configuration().unwrap();
    assert_eq!(configuration.get_str("app.name"), Some("lorn"));
    assert!(configuration.is_production());
    assert!(environment.contains_service(interfaces::CONFIGURATION_BUILDER));

    let exception = environment.build::<ExceptionContainer>();
    exception.set_main_container(environment.main_container().unwrap());
    assert!(Arc::ptr_eq(&configuration, &exception.configuration().unwrap()));
}

#[test]
fn test_missing_env_file() {
    let bootstrapper =
        Bootstrapper::new(AppSettings::default().with_env_file("/nonexistent/lorn/.env"));
    let environment = bootstrapper.initialize().unwrap();
    let container = environment.main_build::<WebContainer>();

    assert!(matches!(
        container.configuration(),
        Err(DependencyError::Configuration {
            source: ConfigurationError::SettingsLoad { .. }
        })
    ));
}

/// 测试请求和响应在容器之间共享
#[test]
fn test_request_and_response_are_shared() {
    let env = env_file("");
    let bootstrapper = bootstrapper(&env, RawRequest::new("GET", "/shared"));
    let environment = bootstrapper.initialize().unwrap();
    let web = environment.main_build::<WebContainer>();
    let exception = environment.build::<ExceptionContainer>();

    assert!(Arc::ptr_eq(&web.http_response().unwrap(), &exception.http_response().unwrap()));
    assert!(Arc::ptr_eq(&web.http_request().unwrap(), &exception.http_request().unwrap()));
    assert_eq!(web.http_request().unwrap().path(), "/shared");
}

/// 测试异常容器未设置错误
#[test]
fn test_exception_container_requires_error() {
    let env = env_file("");
    let bootstrapper = bootstrapper(&env, RawRequest::new("GET", "/"));
    let environment = bootstrapper.initialize().unwrap();
    let exception = environment.build::<ExceptionContainer>();

    assert!(exception.execute_response().is_err());

    let failure = InfrastructureError::from(DependencyError::missing_provider("router"));
    exception.set_error(&failure);
    exception.execute_response().unwrap();
    assert_eq!(exception.error_code(), Some(404));
    assert!(exception.http_response().unwrap().has_status_code(404u16));
}

/// 测试扫描源码目录后可按类型加载文件
#[test]
fn test_scan_source_root() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("HomeController.php"),
        "<?php\nnamespace App\\Http;\nclass HomeController {}\n",
    )
    .unwrap();

    let settings = AppSettings::default().with_source_root(root.path());
    let bootstrapper = Bootstrapper::new(settings);
    bootstrapper.initialize().unwrap();

    assert!(bootstrapper.scanner().lookup("App\\Http\\HomeController").is_some());
    let source = bootstrapper.class_loader().load("App\\Http\\HomeController").unwrap();
    assert!(source.contains("class HomeController"));
}

#[test]
fn test_unreadable_source_root() {
    let settings = AppSettings::default().with_source_root("/nonexistent/lorn/src");
    let bootstrapper = Bootstrapper::new(settings);
    assert!(matches!(
        bootstrapper.initialize(),
        Err(ConfigurationError::SourceUnreadable { .. })
    ));
    assert!(bootstrapper.environment().is_err());
}

/// 测试扫描源码目录后按扫描顺序发现属性
#[test]
fn test_discovery_follows_scan_order() {
    let root = TempDir::new().unwrap();
    for name in ["AlphaProvider", "ZetaProvider"] {
        fs::write(
            root.path().join(format!("{name}.php")),
            format!("<?php\nnamespace App\\Providers;\nclass {name} {{}}\n"),
        )
        .unwrap();
    }

    let bootstrapper = greeter_bootstrapper(AppSettings::default().with_source_root(root.path()));
    let environment = bootstrapper.initialize().unwrap();
    assert_eq!(
        bootstrapper.scanner().type_names(),
        vec!["App\\Providers\\AlphaProvider", "App\\Providers\\ZetaProvider"]
    );
    assert_eq!(first_greeter_class(&bootstrapper).as_deref(), Some("App\\Providers\\AlphaProvider"));

    let container = environment.main_build::<WebContainer>();
    assert_eq!(container.get_as::<String>(GREETER).unwrap().as_str(), "alpha");
}

/// 测试未扫描时按清单登记顺序发现属性
#[test]
fn test_discovery_follows_manifest_order_without_scan() {
    let bootstrapper = greeter_bootstrapper(AppSettings::default());
    bootstrapper.initialize().unwrap();
    assert_eq!(first_greeter_class(&bootstrapper).as_deref(), Some("App\\Providers\\ZetaProvider"));
}
