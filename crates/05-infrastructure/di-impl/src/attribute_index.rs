//! 属性索引
//!
//! [`AttributeCollection`] 持有发现阶段收集的全部属性，构造时按优先级稳定排序，
//! 之后不再修改。[`FilteredCollection`] 是它的独立副本，过滤只作用于副本。

use di_abstractions::{markers, AttributeBuilder, ProviderAttributeBuilder};
use infrastructure_common::{AttributeRecord, TypeCatalog};
use std::sync::Arc;
use tracing::debug;

/// 属性集合
#[derive(Debug, Clone)]
pub struct AttributeCollection {
    items: Vec<Arc<AttributeRecord>>,
    catalog: Arc<TypeCatalog>,
}

impl AttributeCollection {
    /// 创建属性集合
    ///
    /// 按优先级升序稳定排序，同优先级保持发现顺序
    pub fn new(records: Vec<AttributeRecord>, catalog: Arc<TypeCatalog>) -> Self {
        let mut records = records;
        records.sort_by_key(AttributeRecord::priority);
        debug!("属性集合构建完成，共 {} 条", records.len());

        Self {
            items: records.into_iter().map(Arc::new).collect(),
            catalog,
        }
    }

    /// 类型目录
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttributeRecord>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 创建完整副本
    pub fn get_filtered_collection(&self) -> FilteredCollection {
        FilteredCollection {
            items: self.items.clone(),
            catalog: Arc::clone(&self.catalog),
        }
    }

    /// 服务提供者视图
    pub fn get_service_providers(&self) -> FilteredCollection {
        let mut collection = self.get_filtered_collection();
        collection
            .filter_by_instance_type(markers::PROVIDER_ATTRIBUTE)
            .filter(|record| record.target().is_some());
        collection
    }

    /// 异常处理器视图
    pub fn get_exception_handlers(&self) -> FilteredCollection {
        let mut collection = self.get_filtered_collection();
        collection.filter_by_instance_type(markers::EXCEPTION_HANDLER_ATTRIBUTE);
        collection
    }
}

/// 过滤视图
///
/// 过滤方法返回 `&mut Self` 以便链式调用
#[derive(Debug, Clone)]
pub struct FilteredCollection {
    items: Vec<Arc<AttributeRecord>>,
    catalog: Arc<TypeCatalog>,
}

impl FilteredCollection {
    /// 保留名称完全相等的属性
    pub fn filter_by_exact_name(&mut self, name: &str) -> &mut Self {
        self.items.retain(|record| record.has_name(name));
        self
    }

    /// 保留标记类型为 `marker` 实例的属性
    pub fn filter_by_instance_type(&mut self, marker: &str) -> &mut Self {
        let catalog = Arc::clone(&self.catalog);
        self.items
            .retain(|record| record.has_instance(&catalog, marker));
        self
    }

    /// 保留声明类完全相等的属性
    pub fn filter_by_exact_class(&mut self, class: &str) -> &mut Self {
        self.items.retain(|record| record.has_class(class));
        self
    }

    /// 保留声明类为 `class` 或其子类型的属性
    pub fn filter_by_subtype_of_class(&mut self, class: &str) -> &mut Self {
        let catalog = Arc::clone(&self.catalog);
        self.items
            .retain(|record| record.has_class_a(&catalog, class));
        self
    }

    /// 保留目标类型完全相等的属性
    pub fn filter_by_exact_target(&mut self, target: &str) -> &mut Self {
        self.items.retain(|record| record.has_target(target));
        self
    }

    /// 保留目标类型为 `target` 或其子类型的属性
    pub fn filter_by_subtype_of_target(&mut self, target: &str) -> &mut Self {
        let catalog = Arc::clone(&self.catalog);
        self.items
            .retain(|record| record.has_target_a(&catalog, target));
        self
    }

    /// 按谓词过滤
    pub fn filter<F>(&mut self, mut predicate: F) -> &mut Self
    where
        F: FnMut(&AttributeRecord) -> bool,
    {
        self.items.retain(|record| predicate(&**record));
        self
    }

    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&Arc<AttributeRecord>) -> T,
    {
        self.items.iter().map(f).collect()
    }

    pub fn each<F>(&self, f: F)
    where
        F: FnMut(&Arc<AttributeRecord>),
    {
        self.items.iter().for_each(f);
    }

    /// 当前顺序下的第一条，视图为空时返回 `None`
    pub fn first(&self) -> Option<Arc<AttributeRecord>> {
        self.items.first().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttributeRecord>> {
        self.items.iter()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
