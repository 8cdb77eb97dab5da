//! 属性标记抽象接口
//!
//! 定义属性标记的行为契约以及内置标记类型

use infrastructure_common::{AttributeRecord, TypeCatalog};

/// 内置标记类型名称
pub mod markers {
    /// 所有属性标记的根接口
    pub const ATTRIBUTE_BUILDER: &str = "Lorn\\Web\\Interfaces\\Attribute\\IAttributeBuilder";
    /// 服务提供者标记接口
    pub const PROVIDER_ATTRIBUTE: &str = "Lorn\\Web\\Interfaces\\Attribute\\IProviderAttribute";
    /// 异常处理器标记接口
    pub const EXCEPTION_HANDLER_ATTRIBUTE: &str =
        "Lorn\\Web\\Interfaces\\Attribute\\IExceptionHandlerAttribute";
    /// 服务提供者标记
    pub const SERVICE_PROVIDER: &str = "Lorn\\Web\\Attribute\\ServiceProvider";
    /// 异常处理器标记
    pub const EXCEPTION_HANDLER: &str = "Lorn\\Web\\Attribute\\ExceptionHandler";
    /// 数组访问能力，实现它的类不收集方法属性
    pub const ARRAY_ACCESS: &str = "ArrayAccess";
}

/// 内置标记类型的继承关系
pub fn marker_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(markers::ATTRIBUTE_BUILDER, Vec::<String>::new())
        .with_type(markers::PROVIDER_ATTRIBUTE, [markers::ATTRIBUTE_BUILDER])
        .with_type(markers::EXCEPTION_HANDLER_ATTRIBUTE, [markers::ATTRIBUTE_BUILDER])
        .with_type(markers::SERVICE_PROVIDER, [markers::PROVIDER_ATTRIBUTE])
        .with_type(markers::EXCEPTION_HANDLER, [markers::EXCEPTION_HANDLER_ATTRIBUTE])
        .with_type(markers::ARRAY_ACCESS, Vec::<String>::new())
}

/// 属性标记 trait
///
/// is-a 判断通过类型目录完成
pub trait AttributeBuilder {
    /// 标记名称
    fn name(&self) -> &str;

    /// 名称是否完全相等
    fn has_name(&self, name: &str) -> bool;

    /// 写入声明类，只在首次调用时生效
    fn set_class(&mut self, class: &str) -> bool;

    /// 声明类
    fn class(&self) -> Option<&str>;

    /// 声明类是否为 `class` 或其子类型
    fn has_class_a(&self, catalog: &TypeCatalog, class: &str) -> bool;

    /// 声明类是否完全相等
    fn has_class(&self, class: &str) -> bool;

    /// 标记自身是否为 `marker` 的实例
    fn has_instance(&self, catalog: &TypeCatalog, marker: &str) -> bool;

    fn set_priority(&mut self, priority: i32);

    fn priority(&self) -> i32;
}

/// 带目标类型的标记 trait
pub trait ProviderAttributeBuilder: AttributeBuilder {
    fn set_target(&mut self, target: &str);

    fn target(&self) -> Option<&str>;

    /// 目标类型是否为 `target` 或其子类型
    fn has_target_a(&self, catalog: &TypeCatalog, target: &str) -> bool;

    /// 目标类型是否完全相等
    fn has_target(&self, target: &str) -> bool;
}

impl AttributeBuilder for AttributeRecord {
    fn name(&self) -> &str {
        AttributeRecord::name(self)
    }

    fn has_name(&self, name: &str) -> bool {
        AttributeRecord::name(self) == name
    }

    fn set_class(&mut self, class: &str) -> bool {
        self.stamp_class(class)
    }

    fn class(&self) -> Option<&str> {
        AttributeRecord::class(self)
    }

    fn has_class_a(&self, catalog: &TypeCatalog, class: &str) -> bool {
        AttributeRecord::class(self).is_some_and(|own| catalog.is_a(own, class))
    }

    fn has_class(&self, class: &str) -> bool {
        AttributeRecord::class(self) == Some(class)
    }

    fn has_instance(&self, catalog: &TypeCatalog, marker: &str) -> bool {
        catalog.is_a(self.marker(), marker)
    }

    fn set_priority(&mut self, priority: i32) {
        AttributeRecord::set_priority(self, priority);
    }

    fn priority(&self) -> i32 {
        AttributeRecord::priority(self)
    }
}

impl ProviderAttributeBuilder for AttributeRecord {
    fn set_target(&mut self, target: &str) {
        AttributeRecord::set_target(self, target);
    }

    fn target(&self) -> Option<&str> {
        AttributeRecord::target(self)
    }

    fn has_target_a(&self, catalog: &TypeCatalog, target: &str) -> bool {
        AttributeRecord::target(self).is_some_and(|own| catalog.is_a(own, target))
    }

    fn has_target(&self, target: &str) -> bool {
        AttributeRecord::target(self) == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_marker_is_attribute_builder() {
        let catalog = marker_catalog();
        let record = AttributeRecord::new(markers::SERVICE_PROVIDER, "request");
        assert!(record.has_instance(&catalog, markers::ATTRIBUTE_BUILDER));
        assert!(record.has_instance(&catalog, markers::PROVIDER_ATTRIBUTE));
        assert!(!record.has_instance(&catalog, markers::EXCEPTION_HANDLER_ATTRIBUTE));
    }

    #[test]
    fn test_target_checks() {
        let catalog = TypeCatalog::new().with_type("App\\Json", ["App\\IResult"]);
        let record = AttributeRecord::new(markers::SERVICE_PROVIDER, "result").with_target("App\\Json");
        assert!(record.has_target_a(&catalog, "App\\IResult"));
        assert!(record.has_target("App\\Json"));
        assert!(!record.has_target("App\\IResult"));
    }
}
