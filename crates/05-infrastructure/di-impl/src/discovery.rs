//! 基于类型清单的属性发现

use di_abstractions::{
    markers, AttributeBuilder, AttributeDiscovery, ClassEntry, ClassManifest, DiscoveryOptions,
};
use infrastructure_common::{AttributeRecord, AttributeSite, MethodDescriptor, MethodKind, TypeCatalog, Visibility};
use tracing::{debug, info};

/// 清单属性发现器
///
/// 对每个候选类型依次收集类属性、字段属性和方法属性，
/// 只保留标记类型为 `IAttributeBuilder` 的属性，并写入声明类。
#[derive(Debug, Clone, Default)]
pub struct ManifestDiscovery {
    options: DiscoveryOptions,
}

impl ManifestDiscovery {
    pub fn new(options: DiscoveryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    fn accepts_type(&self, entry: &ClassEntry) -> bool {
        if !entry.kind.is_instantiable() {
            debug!("跳过不可实例化类型: {} ({:?})", entry.name, entry.kind);
            return false;
        }
        true
    }

    fn accepts_method(method: &MethodDescriptor) -> bool {
        method.kind == MethodKind::Regular
            && !method.is_magic()
            && !method.is_abstract
            && method.visibility == Visibility::Public
    }

    fn collect(
        catalog: &TypeCatalog,
        class: &str,
        site: AttributeSite,
        attributes: &[AttributeRecord],
        output: &mut Vec<AttributeRecord>,
    ) {
        for attribute in attributes {
            if !attribute.has_instance(catalog, markers::ATTRIBUTE_BUILDER) {
                continue;
            }
            let mut attribute = attribute.clone();
            attribute.set_class(class);
            attribute.set_site(site.clone());
            output.push(attribute);
        }
    }
}

impl AttributeDiscovery for ManifestDiscovery {
    fn discover(&self, manifest: &ClassManifest, candidates: &[String]) -> Vec<AttributeRecord> {
        let catalog = manifest.catalog();
        let mut output = Vec::new();

        for type_name in candidates {
            if self.options.is_excluded_by_name(type_name) {
                continue;
            }
            let Some(entry) = manifest.get(type_name) else {
                debug!("类型未登记，跳过: {}", type_name);
                continue;
            };
            if !self.accepts_type(entry) {
                continue;
            }

            Self::collect(&catalog, &entry.name, AttributeSite::Class, &entry.attributes, &mut output);

            if self.options.include_properties {
                for property in &entry.properties {
                    Self::collect(
                        &catalog,
                        &entry.name,
                        AttributeSite::Property(property.name.clone()),
                        &property.attributes,
                        &mut output,
                    );
                }
            }

            if self.options.include_methods && !catalog.is_a(&entry.name, markers::ARRAY_ACCESS) {
                for method in entry.methods.iter().filter(|method| Self::accepts_method(method)) {
                    Self::collect(
                        &catalog,
                        &entry.name,
                        AttributeSite::Method(method.name.clone()),
                        &method.attributes,
                        &mut output,
                    );
                }
            }
        }

        info!("属性发现完成，{} 个候选类型，{} 条属性", candidates.len(), output.len());
        output
    }

    fn name(&self) -> &str {
        "manifest"
    }
}
