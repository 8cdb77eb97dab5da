//! 错误类型定义

use thiserror::Error;

/// 错误类型在类型目录中的名称
///
/// 异常处理器通过这些名称匹配目标错误类型
pub mod error_types {
    /// 所有基础设施错误的根类型
    pub const INFRASTRUCTURE_ERROR: &str = "Lorn\\Web\\Exception\\InfrastructureError";
    /// 配置错误
    pub const CONFIGURATION_ERROR: &str = "Lorn\\Web\\Exception\\ConfigurationError";
    /// 依赖错误
    pub const DEPENDENCY_ERROR: &str = "Lorn\\Web\\Exception\\DependencyError";
    /// 缺少服务提供者
    pub const MISSING_PROVIDER_ERROR: &str = "Lorn\\Web\\Exception\\MissingProviderError";
    /// 回调错误
    pub const CALLBACK_ERROR: &str = "Lorn\\Web\\Exception\\CallbackError";
    /// 请求处理错误
    pub const HTTP_ERROR: &str = "Lorn\\Web\\Exception\\HttpError";
}

/// 配置错误类型
///
/// 启动阶段的致命错误，不会在核心中恢复
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("类型源目录不可读: {path}")]
    SourceUnreadable { path: String },

    #[error("命名空间中未找到类型: {type_name}")]
    TypeNotFound { type_name: String },

    #[error("类型文件不可读: {path}")]
    FileNotReadable { path: String },

    #[error("进程环境已经初始化")]
    EnvironmentAlreadyInitialized,

    #[error("进程环境尚未初始化")]
    EnvironmentNotInitialized,

    #[error("主容器尚未构建")]
    MainContainerNotInitialized,

    #[error("进程环境已释放")]
    EnvironmentReleased,

    #[error("类型无法构造: {type_name}")]
    NotConstructible { type_name: String },

    #[error("配置加载失败: {path}, 原因: {message}")]
    SettingsLoad { path: String, message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("缺少服务提供者: {name}")]
    MissingProvider { name: String },

    #[error("服务提供者未注册服务: {name}")]
    ServiceNotRegistered { name: String },

    #[error("服务类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("检测到循环解析: {chain}")]
    CircularResolution { chain: String },

    #[error("服务注册失败: {name}, 原因: {message}")]
    RegistrationFailed { name: String, message: String },

    #[error("配置错误: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },
}

impl DependencyError {
    /// 创建缺少服务提供者错误
    pub fn missing_provider(name: impl Into<String>) -> Self {
        Self::MissingProvider { name: name.into() }
    }

    /// 创建服务注册失败错误
    pub fn registration_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 是否为缺少服务提供者
    pub fn is_missing_provider(&self) -> bool {
        matches!(self, Self::MissingProvider { .. })
    }
}

/// 回调错误类型
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("无效的回调: {callback}")]
    InvalidCallback { callback: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigurationError {
        #[from]
        source: ConfigurationError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("回调错误: {source}")]
    CallbackError {
        #[from]
        source: CallbackError,
    },

    #[error("请求处理失败: {status} {message}")]
    RequestFailed { status: u16, message: String },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

impl InfrastructureError {
    /// 对应的 HTTP 状态码
    ///
    /// 缺少服务提供者为 404，请求错误使用自身状态码，其余为 500
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DependencyError { source } if source.is_missing_provider() => 404,
            Self::RequestFailed { status, .. } => *status,
            _ => 500,
        }
    }

    /// 错误在类型目录中的名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => error_types::CONFIGURATION_ERROR,
            Self::DependencyError {
                source: DependencyError::Configuration { .. },
            } => error_types::CONFIGURATION_ERROR,
            Self::DependencyError { source } if source.is_missing_provider() => {
                error_types::MISSING_PROVIDER_ERROR
            }
            Self::DependencyError { .. } => error_types::DEPENDENCY_ERROR,
            Self::CallbackError { .. } => error_types::CALLBACK_ERROR,
            Self::RequestFailed { .. } => error_types::HTTP_ERROR,
            Self::BootstrapFailed { .. } => error_types::INFRASTRUCTURE_ERROR,
        }
    }
}

/// 结果类型别名
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
