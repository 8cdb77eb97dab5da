//! 类型目录
//!
//! 记录类型名称与其直接父类型（父类、接口）之间的关系，
//! 为属性过滤提供 is-a 判断。

use std::collections::{HashMap, HashSet, VecDeque};

/// 类型目录
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    supertypes: HashMap<String, Vec<String>>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 以构建者方式添加类型
    pub fn with_type<I, S>(mut self, name: impl Into<String>, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(name, supertypes);
        self
    }

    /// 注册类型及其直接父类型，重复注册时合并父类型
    pub fn register<I, S>(&mut self, name: impl Into<String>, supertypes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.supertypes.entry(name.into()).or_default();
        for supertype in supertypes {
            let supertype = supertype.into();
            if !entry.contains(&supertype) {
                entry.push(supertype);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.supertypes.contains_key(name)
    }

    /// 直接父类型
    pub fn supertypes(&self, name: &str) -> &[String] {
        self.supertypes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `name` 是否为 `ancestor` 或其子类型
    ///
    /// 未登记的类型只与自身相等
    pub fn is_a(&self, name: &str, ancestor: &str) -> bool {
        if name == ancestor {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([name]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for supertype in self.supertypes(current) {
                if supertype == ancestor {
                    return true;
                }
                queue.push_back(supertype);
            }
        }
        false
    }

    /// 合并另一个目录
    pub fn merge(&mut self, other: &TypeCatalog) {
        for (name, supertypes) in &other.supertypes {
            self.register(name.clone(), supertypes.iter().cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }
}
