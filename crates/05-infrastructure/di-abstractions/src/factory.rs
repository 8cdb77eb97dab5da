//! 类型工厂
//!
//! 清单中记录的构造函数，替代按类型名称动态实例化

use crate::container::ContainerBuilder;
use crate::handler::ExceptionHandler;
use crate::provider::ServiceProvider;
use std::fmt;

/// 服务提供者构造函数，以当前容器为参数
pub type ProviderConstructor = fn(&dyn ContainerBuilder) -> Box<dyn ServiceProvider>;

/// 异常处理器构造函数
pub type HandlerConstructor = fn() -> Box<dyn ExceptionHandler>;

/// 类型工厂
#[derive(Clone, Copy)]
pub enum ClassFactory {
    /// 服务提供者
    Provider(ProviderConstructor),
    /// 异常处理器
    ExceptionHandler(HandlerConstructor),
}

impl ClassFactory {
    /// 取服务提供者构造函数
    pub fn as_provider(&self) -> Option<ProviderConstructor> {
        match self {
            Self::Provider(constructor) => Some(*constructor),
            Self::ExceptionHandler(_) => None,
        }
    }

    /// 取异常处理器构造函数
    pub fn as_exception_handler(&self) -> Option<HandlerConstructor> {
        match self {
            Self::ExceptionHandler(constructor) => Some(*constructor),
            Self::Provider(_) => None,
        }
    }
}

impl fmt::Debug for ClassFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(_) => f.write_str("ClassFactory::Provider"),
            Self::ExceptionHandler(_) => f.write_str("ClassFactory::ExceptionHandler"),
        }
    }
}
