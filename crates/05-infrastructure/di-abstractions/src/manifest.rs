//! 类型清单
//!
//! 启动时显式登记的类型表，替代运行时反射。
//! 每个条目描述类型种类、父类型、属性标记、成员以及构造方式。

use crate::attribute::{marker_catalog, markers};
use crate::factory::{ClassFactory, HandlerConstructor, ProviderConstructor};
use infrastructure_common::{
    error_types, AttributeRecord, AttributeSite, MethodDescriptor, PropertyDescriptor, TypeCatalog,
    TypeKind,
};
use std::collections::HashMap;
use tracing::debug;

/// 可以描述自身的类型
///
/// 通常由 `#[service_provider]`、`#[exception_handler]` 宏实现
pub trait Describe {
    /// 生成清单条目
    fn describe() -> ClassEntry;
}

/// 清单条目
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// 完全限定名
    pub name: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 直接父类型
    pub supertypes: Vec<String>,
    /// 类级别属性
    pub attributes: Vec<AttributeRecord>,
    /// 字段
    pub properties: Vec<PropertyDescriptor>,
    /// 方法
    pub methods: Vec<MethodDescriptor>,
    /// 构造方式
    pub factory: Option<ClassFactory>,
}

impl ClassEntry {
    /// 创建可实例化类的条目
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            supertypes: Vec::new(),
            attributes: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            factory: None,
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// 添加父类型
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// 添加类级别属性
    pub fn with_attribute(mut self, attribute: AttributeRecord) -> Self {
        self.attributes.push(attribute.with_site(AttributeSite::Class));
        self
    }

    /// 添加服务提供者标记
    pub fn provides(self, name: impl Into<String>, target: impl Into<String>, priority: i32) -> Self {
        self.with_attribute(
            AttributeRecord::new(markers::SERVICE_PROVIDER, name)
                .with_target(target)
                .with_priority(priority),
        )
    }

    /// 添加异常处理器标记
    pub fn handles(self, target: impl Into<String>, priority: i32) -> Self {
        let name = self.name.clone();
        self.with_attribute(
            AttributeRecord::new(markers::EXCEPTION_HANDLER, name)
                .with_target(target)
                .with_priority(priority),
        )
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 以服务提供者方式构造
    pub fn with_provider(mut self, constructor: ProviderConstructor) -> Self {
        self.factory = Some(ClassFactory::Provider(constructor));
        self
    }

    /// 以异常处理器方式构造
    pub fn with_handler(mut self, constructor: HandlerConstructor) -> Self {
        self.factory = Some(ClassFactory::ExceptionHandler(constructor));
        self
    }
}

/// 类型清单
///
/// 保持登记顺序，同名条目后者覆盖前者
#[derive(Debug, Clone, Default)]
pub struct ClassManifest {
    entries: Vec<ClassEntry>,
    index: HashMap<String, usize>,
}

impl ClassManifest {
    /// 创建空清单
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记条目
    pub fn register(&mut self, entry: ClassEntry) {
        if let Some(&position) = self.index.get(&entry.name) {
            debug!("覆盖清单条目: {}", entry.name);
            self.entries[position] = entry;
        } else {
            self.index.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// 登记可描述类型
    pub fn register_type<T: Describe>(&mut self) {
        self.register(T::describe());
    }

    pub fn with_entry(mut self, entry: ClassEntry) -> Self {
        self.register(entry);
        self
    }

    pub fn with_type<T: Describe>(mut self) -> Self {
        self.register_type::<T>();
        self
    }

    /// 合并另一个清单
    pub fn merge(&mut self, other: ClassManifest) {
        for entry in other.entries {
            self.register(entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 按登记顺序遍历
    pub fn entries(&self) -> impl Iterator<Item = &ClassEntry> {
        self.entries.iter()
    }

    /// 按登记顺序返回名称
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 构建类型目录
    ///
    /// 包含内置标记、错误类型以及所有条目的父类型
    pub fn catalog(&self) -> TypeCatalog {
        let mut catalog = builtin_catalog();
        for entry in &self.entries {
            catalog.register(entry.name.clone(), entry.supertypes.iter().cloned());
        }
        catalog
    }
}

/// 内置类型目录：标记类型与错误类型层次
pub fn builtin_catalog() -> TypeCatalog {
    let mut catalog = marker_catalog();
    catalog.register(error_types::INFRASTRUCTURE_ERROR, Vec::<String>::new());
    catalog.register(error_types::CONFIGURATION_ERROR, [error_types::INFRASTRUCTURE_ERROR]);
    catalog.register(error_types::DEPENDENCY_ERROR, [error_types::INFRASTRUCTURE_ERROR]);
    catalog.register(error_types::MISSING_PROVIDER_ERROR, [error_types::DEPENDENCY_ERROR]);
    catalog.register(error_types::CALLBACK_ERROR, [error_types::INFRASTRUCTURE_ERROR]);
    catalog.register(error_types::HTTP_ERROR, [error_types::INFRASTRUCTURE_ERROR]);
    catalog
}
