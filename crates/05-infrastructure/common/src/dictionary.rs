//! 字典
//!
//! 字符串键到 JSON 值的有序映射，用于请求头、请求输入和配置项

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 字典
///
/// 迭代顺序为键的字典序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    items: Map<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象创建
    pub fn from_object(items: Map<String, Value>) -> Self {
        Self { items }
    }

    /// 合并 JSON 对象，已存在的键被覆盖
    pub fn load_object(&mut self, items: Map<String, Value>) {
        self.items.extend(items);
    }

    /// 合并键值对
    pub fn load_pairs<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.items.insert(key.into(), value.into());
        }
    }

    /// 合并 JSON 文本，文本必须是对象
    pub fn load_json_str(&mut self, json: &str) -> serde_json::Result<()> {
        let items: Map<String, Value> = serde_json::from_str(json)?;
        self.load_object(items);
        Ok(())
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// 取字符串值，非字符串返回 `None`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.items.get(key).and_then(Value::as_str)
    }

    /// 删除键，键不存在时返回 `false`
    pub fn remove(&mut self, key: &str) -> bool {
        self.items.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// 映射为新字典
    pub fn map<F>(&self, mut f: F) -> Dictionary
    where
        F: FnMut(&str, &Value) -> Value,
    {
        let items = self
            .items
            .iter()
            .map(|(key, value)| (key.clone(), f(key, value)))
            .collect();
        Self { items }
    }

    /// 过滤为新字典
    pub fn filter<F>(&self, mut predicate: F) -> Dictionary
    where
        F: FnMut(&str, &Value) -> bool,
    {
        let items = self
            .items
            .iter()
            .filter(|(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self { items }
    }

    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Value),
    {
        for (key, value) in &self.items {
            f(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.items
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dictionary = Self::new();
        dictionary.load_pairs(iter);
        dictionary
    }
}
