//! 启动器
//!
//! 负责扫描源码目录、发现属性、创建唯一的进程环境，
//! 并驱动主容器完成一次请求。

use crate::containers::{ExceptionContainer, WebContainer};
use crate::names::services;
use crate::providers::builtin_manifest;
use configuration::AppSettings;
use di_abstractions::{AttributeDiscovery, ClassManifest, Describe, ServiceScopeExt, TypeScanner};
use di_impl::{AttributeCollection, ClassLoader, Environment, ManifestDiscovery, SourceScanner};
use infrastructure_common::{ConfigurationError, InfrastructureError, InfrastructureResult};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};
use web_http::RawRequest;

/// 启动器
pub struct Bootstrapper {
    settings: AppSettings,
    manifest: ClassManifest,
    raw_request: Option<RawRequest>,
    scanner: Arc<SourceScanner>,
    environment: OnceCell<Arc<Environment>>,
}

impl Bootstrapper {
    /// 创建启动器，清单中已包含内置类型
    pub fn new(settings: AppSettings) -> Self {
        let scanner = Arc::new(SourceScanner::new(settings.scan_options()));
        Self {
            settings,
            manifest: builtin_manifest(),
            raw_request: None,
            scanner,
            environment: OnceCell::new(),
        }
    }

    /// 合并应用清单
    pub fn with_manifest(mut self, manifest: ClassManifest) -> Self {
        self.manifest.merge(manifest);
        self
    }

    /// 登记带属性的类型
    pub fn with_type<T: Describe>(mut self) -> Self {
        self.manifest.register_type::<T>();
        self
    }

    /// 设置当前请求
    pub fn with_raw_request(mut self, raw: RawRequest) -> Self {
        self.raw_request = Some(raw);
        self
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn manifest(&self) -> &ClassManifest {
        &self.manifest
    }

    pub fn scanner(&self) -> &Arc<SourceScanner> {
        &self.scanner
    }

    /// 基于扫描索引的类型加载器
    pub fn class_loader(&self) -> ClassLoader {
        ClassLoader::new(Arc::clone(&self.scanner))
    }

    /// 创建进程环境，只能调用一次
    pub fn initialize(&self) -> Result<Arc<Environment>, ConfigurationError> {
        if self.environment.get().is_some() {
            return Err(ConfigurationError::EnvironmentAlreadyInitialized);
        }

        if let Some(root) = &self.settings.source_root {
            info!("扫描源码目录: {}", root.display());
            let added = self.scanner.scan(root)?;
            info!("扫描完成: 新增 {} 个类型, 共 {} 个", added, self.scanner.len());
        }

        let candidates = self.candidates();
        let discovery = ManifestDiscovery::new(self.settings.discovery_options());
        let records = discovery.discover(&self.manifest, &candidates);
        debug!("{} 发现 {} 条属性", discovery.name(), records.len());

        let attributes = AttributeCollection::new(records, Arc::new(self.manifest.catalog()));
        let environment = Environment::new(attributes, Arc::new(self.manifest.clone()));
        environment.singleton_as(services::SETTINGS, self.settings.clone());
        if let Some(raw) = &self.raw_request {
            environment.singleton_as(services::RAW_REQUEST, raw.clone());
        }

        self.environment
            .set(Arc::clone(&environment))
            .map_err(|_| ConfigurationError::EnvironmentAlreadyInitialized)?;
        Ok(environment)
    }

    /// 已创建的进程环境
    pub fn environment(&self) -> Result<Arc<Environment>, ConfigurationError> {
        self.environment
            .get()
            .cloned()
            .ok_or(ConfigurationError::EnvironmentNotInitialized)
    }

    /// 构建主容器、执行请求并输出响应
    pub fn run<W: Write>(&self, writer: &mut W) -> InfrastructureResult<()> {
        let environment = self.environment()?;
        let container = environment.main_build::<WebContainer>();
        container.execute_response()?;
        container
            .http_response()?
            .write_to(&self.settings.protocol, writer)?;
        Ok(())
    }

    /// 运行异常处理器并输出错误响应
    pub fn render_failure<W: Write>(
        &self,
        failure: &InfrastructureError,
        writer: &mut W,
    ) -> InfrastructureResult<()> {
        let environment = self.environment()?;
        match environment.handle_exception(failure) {
            Ok(handled) => debug!("异常处理器运行数量: {}", handled),
            Err(e) => warn!("异常处理器失败: {}", e),
        }

        let exception = environment.build::<ExceptionContainer>();
        exception.set_error(failure);
        if let Some(main) = environment.main_container() {
            exception.set_main_container(main);
        }
        exception.execute_response()?;
        exception
            .http_response()?
            .write_to(&self.settings.protocol, writer)?;
        Ok(())
    }

    /// 发现顺序：扫描顺序在前，其余按清单登记顺序
    fn candidates(&self) -> Vec<String> {
        let mut candidates = self.scanner.type_names();
        let mut seen: HashSet<String> = candidates.iter().cloned().collect();
        for name in self.manifest.names() {
            if seen.insert(name.clone()) {
                candidates.push(name);
            }
        }
        candidates
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("settings", &self.settings)
            .field("types", &self.manifest.len())
            .field("initialized", &self.environment.get().is_some())
            .finish()
    }
}
