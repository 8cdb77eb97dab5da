//! 属性发现抽象接口
//!
//! 从类型清单中收集属性标记

use crate::manifest::ClassManifest;
use infrastructure_common::AttributeRecord;

/// 属性发现器 trait
pub trait AttributeDiscovery: Send + Sync {
    /// 按候选类型顺序收集属性，结果保持发现顺序
    fn discover(&self, manifest: &ClassManifest, candidates: &[String]) -> Vec<AttributeRecord>;

    /// 获取发现器名称
    fn name(&self) -> &str;
}

/// 发现选项
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// 跳过名称中包含 `Interface`、`Trait`、`Attribute` 的类型
    pub legacy_name_filter: bool,
    /// 是否收集字段上的属性
    pub include_properties: bool,
    /// 是否收集方法上的属性
    pub include_methods: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            legacy_name_filter: true,
            include_properties: true,
            include_methods: true,
        }
    }
}

impl DiscoveryOptions {
    /// 设置名称过滤
    pub fn with_legacy_name_filter(mut self, enabled: bool) -> Self {
        self.legacy_name_filter = enabled;
        self
    }

    /// 名称是否被旧式规则排除
    pub fn is_excluded_by_name(&self, type_name: &str) -> bool {
        self.legacy_name_filter
            && ["Interface", "Trait", "Attribute"]
                .iter()
                .any(|fragment| type_name.contains(fragment))
    }
}
