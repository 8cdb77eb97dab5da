//! 属性驱动的服务解析器

use crate::attribute_index::AttributeCollection;
use di_abstractions::{
    ClassManifest, ContainerBuilder, ResolveContext, ResolveOptions, ServiceResolver,
};
use infrastructure_common::{AttributeRecord, ConfigurationError, DependencyError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// 解析守卫
///
/// 创建时把名称压入解析链，离开作用域时弹出
struct ResolutionGuard<'a> {
    context: &'a Mutex<ResolveContext>,
    name: String,
}

impl<'a> ResolutionGuard<'a> {
    fn new(context: &'a Mutex<ResolveContext>, name: &str) -> Result<Self, DependencyError> {
        context.lock().push_name(name)?;
        Ok(Self {
            context,
            name: name.to_string(),
        })
    }
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.context.lock().pop_name(&self.name);
    }
}

/// 属性服务解析器
///
/// 在服务提供者视图中查找目标类型为请求名称子类型的属性，
/// 找不到时按属性名称查找，取当前顺序下的第一条。
pub struct AttributeProviderResolver {
    attributes: Arc<AttributeCollection>,
    manifest: Arc<ClassManifest>,
    context: Mutex<ResolveContext>,
}

impl AttributeProviderResolver {
    /// 创建解析器
    pub fn new(attributes: Arc<AttributeCollection>, manifest: Arc<ClassManifest>) -> Self {
        Self {
            attributes,
            manifest,
            context: Mutex::new(ResolveContext::new()),
        }
    }

    /// 设置解析选项
    pub fn with_options(self, options: ResolveOptions) -> Self {
        self.context.lock().options = options;
        self
    }

    /// 查找名称对应的服务提供者属性
    pub fn find_provider(&self, name: &str) -> Option<Arc<AttributeRecord>> {
        let mut providers = self.attributes.get_service_providers();
        providers.filter_by_subtype_of_target(name);
        if let Some(record) = providers.first() {
            return Some(record);
        }

        if !self.context.lock().options.name_fallback {
            return None;
        }
        let mut providers = self.attributes.get_service_providers();
        providers.filter_by_exact_name(name);
        providers.first()
    }
}

impl ServiceResolver for AttributeProviderResolver {
    fn resolve(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError> {
        let record = self
            .find_provider(name)
            .ok_or_else(|| DependencyError::missing_provider(name))?;

        let class = record.class().unwrap_or_default();
        let constructor = self
            .manifest
            .get(class)
            .and_then(|entry| entry.factory)
            .and_then(|factory| factory.as_provider())
            .ok_or_else(|| ConfigurationError::NotConstructible {
                type_name: class.to_string(),
            })?;

        let _guard = ResolutionGuard::new(&self.context, name)?;
        info!("通过服务提供者 {} 解析服务: {}", class, name);

        let provider = constructor(container);
        provider.register(container, name)?;
        debug!("服务提供者 {} 注册完成", class);
        Ok(())
    }

    fn can_resolve(&self, name: &str) -> bool {
        self.find_provider(name).is_some()
    }
}

impl std::fmt::Debug for AttributeProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeProviderResolver")
            .field("providers", &self.attributes.get_service_providers().count())
            .finish()
    }
}
