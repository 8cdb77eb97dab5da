//! 服务解析器抽象接口
//!
//! 按名称查找服务提供者并要求其注册服务

use crate::container::ContainerBuilder;
use infrastructure_common::DependencyError;

/// 服务解析器 trait
pub trait ServiceResolver: Send + Sync {
    /// 解析名为 `name` 的服务
    ///
    /// 构造匹配的提供者并调用一次 `register`，
    /// 实例由提供者放入容器或进程环境
    fn resolve(&self, container: &dyn ContainerBuilder, name: &str) -> Result<(), DependencyError>;

    /// 是否存在可解析该名称的提供者
    fn can_resolve(&self, name: &str) -> bool;
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环解析
    pub resolution_chain: Vec<String>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// 添加名称到解析链
    pub fn push_name(&mut self, name: &str) -> Result<(), DependencyError> {
        if self.resolution_chain.iter().any(|resolving| resolving == name)
            || self.resolution_chain.len() >= self.options.max_depth
        {
            let mut chain = self.resolution_chain.clone();
            chain.push(name.to_string());
            return Err(DependencyError::CircularResolution {
                chain: chain.join(" -> "),
            });
        }
        self.resolution_chain.push(name.to_string());
        Ok(())
    }

    /// 从解析链中移除名称
    pub fn pop_name(&mut self, name: &str) {
        if let Some(position) = self.resolution_chain.iter().rposition(|resolving| resolving == name) {
            self.resolution_chain.remove(position);
        }
    }

    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
    /// 精确目标匹配失败时是否按属性名称查找
    pub name_fallback: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            name_fallback: true,
        }
    }
}
