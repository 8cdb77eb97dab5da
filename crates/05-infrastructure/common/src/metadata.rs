//! 元数据定义
//!
//! 提供类型、成员和属性标记的元数据信息

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 类型种类
///
/// 替代按名称猜测类型角色的做法，显式标记接口、特征、匿名类等
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// 可实例化的类
    Class,
    /// 抽象类
    AbstractClass,
    /// 接口
    Interface,
    /// 特征
    Trait,
    /// 匿名类
    Anonymous,
}

impl TypeKind {
    /// 是否可以实例化
    pub fn is_instantiable(self) -> bool {
        matches!(self, Self::Class)
    }
}

/// 成员可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// 方法种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Regular,
    Constructor,
    Destructor,
}

/// 属性标记的附着位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeSite {
    /// 类级别
    Class,
    /// 方法级别
    Method(String),
    /// 属性级别
    Property(String),
}

/// 属性记录
///
/// 发现阶段产生的 name / class / priority / target 元组。
/// `name` 构造后不可变，`class` 只能写入一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    name: String,
    class: Option<String>,
    priority: i32,
    target: Option<String>,
    marker: String,
    site: AttributeSite,
}

impl AttributeRecord {
    /// 创建新的属性记录
    pub fn new(marker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: None,
            priority: 0,
            target: None,
            marker: marker.into(),
            site: AttributeSite::Class,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 设置目标类型
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// 设置附着位置
    pub fn with_site(mut self, site: AttributeSite) -> Self {
        self.site = site;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// 标记类型名称
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn site(&self) -> &AttributeSite {
        &self.site
    }

    /// 写入声明类
    ///
    /// 已写入时保留原值并返回 `false`
    pub fn stamp_class(&mut self, class: impl Into<String>) -> bool {
        let class = class.into();
        match &self.class {
            Some(existing) => {
                warn!("属性 {} 的声明类已设置为 {}, 忽略 {}", self.name, existing, class);
                false
            }
            None => {
                self.class = Some(class);
                true
            }
        }
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    pub fn set_site(&mut self, site: AttributeSite) {
        self.site = site;
    }
}

/// 方法描述
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: String,
    /// 可见性
    pub visibility: Visibility,
    /// 方法种类
    pub kind: MethodKind,
    /// 是否抽象
    pub is_abstract: bool,
    /// 方法上的属性
    pub attributes: Vec<AttributeRecord>,
}

impl MethodDescriptor {
    /// 创建公开的普通方法
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            kind: MethodKind::Regular,
            is_abstract: false,
            attributes: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeRecord) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// 是否按魔术方法处理：名称中任意位置含 `__`
    pub fn is_magic(&self) -> bool {
        self.name.contains("__")
    }
}

/// 属性（字段）描述
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// 字段名称
    pub name: String,
    /// 字段上的属性
    pub attributes: Vec<AttributeRecord>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeRecord) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试声明类只能写入一次
    #[test]
    fn test_class_is_stamped_once() {
        let mut record = AttributeRecord::new("Marker", "configuration").with_priority(3);
        assert!(record.stamp_class("App\\First"));
        assert!(!record.stamp_class("App\\Second"));
        assert_eq!(record.class(), Some("App\\First"));
        assert_eq!(record.priority(), 3);
        assert_eq!(record.name(), "configuration");
    }

    #[test]
    fn test_magic_method_detection() {
        assert!(MethodDescriptor::public("__toString").is_magic());
        assert!(MethodDescriptor::public("load__cache").is_magic());
        assert!(MethodDescriptor::public("flush__").is_magic());
        assert!(!MethodDescriptor::public("index").is_magic());
        assert!(!MethodDescriptor::public("snake_case_name").is_magic());
    }
}
