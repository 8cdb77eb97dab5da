//! 进程环境
//!
//! 持有属性索引、类型清单、解析器、进程级服务集合和容器索引。
//! 每种容器类型至多一个实例，主容器用于进程级服务解析和异常处理。

use crate::attribute_index::AttributeCollection;
use crate::container::{ContainerType, ServiceContainer};
use crate::discovery::ManifestDiscovery;
use crate::registry::ServiceCollection;
use crate::resolver::AttributeProviderResolver;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use di_abstractions::{
    AttributeDiscovery, ClassManifest, ContainerBuilder, ServiceInstance, ServiceRegistry,
    ServiceResolver, ServiceScope,
};
use infrastructure_common::{
    CallbackError, ConfigurationError, DependencyError, InfrastructureError,
};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// 进程环境类型名称
pub const ENVIRONMENT_TYPE: &str = "Lorn\\Web\\Environment\\EnvironmentBuilder";

/// 容器索引中的一项
#[derive(Clone)]
struct ContainerSlot {
    typed: Arc<dyn Any + Send + Sync>,
    dynamic: Arc<dyn ContainerBuilder>,
}

/// 容器索引
///
/// 以容器类型名称为键
#[derive(Default)]
pub struct ContainerIndex {
    slots: DashMap<String, ContainerSlot>,
}

impl ContainerIndex {
    fn insert(&self, type_name: &str, slot: ContainerSlot) {
        if self.slots.insert(type_name.to_string(), slot).is_some() {
            debug!("替换已存在的容器: {}", type_name);
        }
    }

    fn get(&self, type_name: &str) -> Option<ContainerSlot> {
        self.slots.get(type_name).map(|slot| slot.value().clone())
    }

    pub fn remove(&self, type_name: &str) -> bool {
        self.slots.remove(type_name).is_some()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.slots.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// 进程环境
pub struct Environment {
    attributes: Arc<AttributeCollection>,
    manifest: Arc<ClassManifest>,
    resolver: Arc<dyn ServiceResolver>,
    services: ServiceCollection,
    containers: ContainerIndex,
    main: RwLock<Option<Arc<dyn ContainerBuilder>>>,
    started_at: DateTime<Utc>,
    self_ref: Weak<Environment>,
}

impl Environment {
    /// 创建进程环境，使用属性服务解析器
    pub fn new(attributes: AttributeCollection, manifest: Arc<ClassManifest>) -> Arc<Self> {
        let attributes = Arc::new(attributes);
        let resolver = Arc::new(AttributeProviderResolver::new(
            Arc::clone(&attributes),
            Arc::clone(&manifest),
        ));
        Self::with_resolver(attributes, manifest, resolver)
    }

    /// 使用指定解析器创建进程环境
    pub fn with_resolver(
        attributes: Arc<AttributeCollection>,
        manifest: Arc<ClassManifest>,
        resolver: Arc<dyn ServiceResolver>,
    ) -> Arc<Self> {
        info!(
            "进程环境初始化: {} 个类型, {} 条属性",
            manifest.len(),
            attributes.len()
        );
        Arc::new_cyclic(|self_ref| Self {
            attributes,
            manifest,
            resolver,
            services: ServiceCollection::new(),
            containers: ContainerIndex::default(),
            main: RwLock::new(None),
            started_at: Utc::now(),
            self_ref: self_ref.clone(),
        })
    }

    /// 按清单登记顺序发现属性并创建进程环境
    pub fn from_manifest(manifest: ClassManifest) -> Arc<Self> {
        let candidates = manifest.names();
        let records = ManifestDiscovery::default().discover(&manifest, &candidates);
        let attributes = AttributeCollection::new(records, Arc::new(manifest.catalog()));
        Self::new(attributes, Arc::new(manifest))
    }

    pub fn attributes(&self) -> &Arc<AttributeCollection> {
        &self.attributes
    }

    pub fn manifest(&self) -> &Arc<ClassManifest> {
        &self.manifest
    }

    pub fn resolver(&self) -> &Arc<dyn ServiceResolver> {
        &self.resolver
    }

    /// 进程级服务集合
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    pub fn containers(&self) -> &ContainerIndex {
        &self.containers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 构建容器并加入容器索引，同类型容器被替换
    pub fn build<C: ContainerType>(&self) -> Arc<C> {
        let base = ServiceContainer::new(C::TYPE_NAME, self.self_ref.clone());
        let container = Arc::new(C::create(base));
        self.containers.insert(
            C::TYPE_NAME,
            ContainerSlot {
                typed: Arc::clone(&container) as Arc<dyn Any + Send + Sync>,
                dynamic: Arc::clone(&container) as Arc<dyn ContainerBuilder>,
            },
        );
        info!("构建容器: {}", C::TYPE_NAME);
        container
    }

    /// 构建主容器
    pub fn main_build<C: ContainerType>(&self) -> Arc<C> {
        let container = self.build::<C>();
        *self.main.write() = Some(Arc::clone(&container) as Arc<dyn ContainerBuilder>);
        info!("主容器: {}", C::TYPE_NAME);
        container
    }

    /// 获取容器，不存在时构建
    pub fn get<C: ContainerType>(&self) -> Result<Arc<C>, DependencyError> {
        match self.containers.get(C::TYPE_NAME) {
            Some(slot) => slot
                .typed
                .downcast::<C>()
                .map_err(|_| DependencyError::TypeMismatch {
                    name: C::TYPE_NAME.to_string(),
                    expected: std::any::type_name::<C>().to_string(),
                }),
            None => Ok(self.build::<C>()),
        }
    }

    /// 按类型名称获取已构建的容器
    pub fn container(&self, type_name: &str) -> Option<Arc<dyn ContainerBuilder>> {
        self.containers.get(type_name).map(|slot| slot.dynamic)
    }

    pub fn remove_container(&self, type_name: &str) -> bool {
        let removed = self.containers.remove(type_name);
        let mut main = self.main.write();
        if (*main).as_ref().is_some_and(|container| container.type_name() == type_name) {
            *main = None;
        }
        removed
    }

    pub fn contains_container(&self, type_name: &str) -> bool {
        self.containers.contains(type_name)
    }

    /// 主容器
    pub fn main_container(&self) -> Option<Arc<dyn ContainerBuilder>> {
        self.main.read().clone()
    }

    /// 运行异常处理器
    ///
    /// 依次运行能处理错误类型、主容器类型、进程环境类型的处理器，返回运行数量。
    /// 处理器的目标类型为这些类型本身或其父类型时匹配。
    pub fn handle_exception(&self, failure: &InfrastructureError) -> Result<usize, InfrastructureError> {
        error!("处理错误: {}", failure);
        let main = self.main_container();

        let mut targets = vec![failure.type_name().to_string()];
        if let Some(container) = &main {
            targets.push(container.type_name().to_string());
        }
        targets.push(ENVIRONMENT_TYPE.to_string());

        let catalog = Arc::clone(self.attributes.catalog());
        let mut handled = 0;
        for target in &targets {
            let mut handlers = self.attributes.get_exception_handlers();
            handlers.filter(|record| {
                record
                    .target()
                    .is_some_and(|handled_type| catalog.is_a(target, handled_type))
            });

            for record in handlers.iter() {
                let class = record.class().unwrap_or_default();
                let constructor = self
                    .manifest
                    .get(class)
                    .and_then(|entry| entry.factory)
                    .and_then(|factory| factory.as_exception_handler())
                    .ok_or_else(|| CallbackError::InvalidCallback {
                        callback: class.to_string(),
                    })?;

                debug!("运行异常处理器 {} (目标 {})", class, target);
                constructor().handle(failure, main.as_deref())?;
                handled += 1;
            }
        }

        if handled == 0 {
            warn!("没有匹配的异常处理器: {}", failure.type_name());
        }
        Ok(handled)
    }
}

impl ServiceScope for Environment {
    fn get_service(&self, name: &str) -> Result<ServiceInstance, DependencyError> {
        if let Some(instance) = self.services.get(name) {
            return Ok(instance);
        }

        let main = self
            .main_container()
            .ok_or(ConfigurationError::MainContainerNotInitialized)?;
        self.resolver.resolve(main.as_ref(), name)?;

        self.services
            .get(name)
            .ok_or_else(|| DependencyError::ServiceNotRegistered {
                name: name.to_string(),
            })
    }

    fn singleton(&self, name: &str, instance: ServiceInstance) {
        self.services.add(name, instance);
    }

    fn remove_service(&self, name: &str) -> bool {
        self.services.remove(name)
    }

    fn contains_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("attributes", &self.attributes.len())
            .field("manifest", &self.manifest.len())
            .field("services", &self.services)
            .field("containers", &self.containers.len())
            .field("started_at", &self.started_at)
            .finish()
    }
}
