//! 翻译解析模块统一错误处理
//!
//! 提供者失败以值的形式返回，由编排器决定回退或向调用方传播

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::env::EnvError;
use crate::translation::types::SourceTag;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 输入验证错误（空白文本、超长文本）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 提供者完全没有响应
    #[error("网络错误: {0}")]
    NetworkFailure(String),

    /// 提供者返回了显式错误或非2xx状态
    #[error("远程服务错误: {0}")]
    RemoteError(String),

    /// 2xx响应，但内容与当前模式期望的形状不符
    #[error("响应格式不符: {0}")]
    UnexpectedShape(String),

    /// 提供者理解了请求但没有结果，不是真正的错误
    #[error("未找到结果: {0}")]
    SemanticMiss(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl TranslationError {
    /// 获取错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslationError::InvalidInput(_) => ErrorKind::InvalidInput,
            TranslationError::NetworkFailure(_) => ErrorKind::NetworkFailure,
            TranslationError::RemoteError(_) => ErrorKind::RemoteError,
            TranslationError::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
            TranslationError::SemanticMiss(_) => ErrorKind::SemanticMiss,
            TranslationError::ConfigError(_) => ErrorKind::Configuration,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::SemanticMiss(_) => ErrorSeverity::Info,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::NetworkFailure(_) => ErrorSeverity::Warning,
            TranslationError::RemoteError(_) => ErrorSeverity::Warning,
            TranslationError::UnexpectedShape(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否允许编排器继续尝试下一个提供者
    pub fn is_recoverable(&self) -> bool {
        match self {
            TranslationError::SemanticMiss(_) => true,
            TranslationError::NetworkFailure(_) => true,
            TranslationError::RemoteError(_) => true,
            TranslationError::UnexpectedShape(_) => true,
            TranslationError::InvalidInput(_) => false,
            TranslationError::ConfigError(_) => false,
        }
    }

    /// 是否为语义未命中
    pub fn is_semantic_miss(&self) -> bool {
        matches!(self, TranslationError::SemanticMiss(_))
    }

    /// 错误详情（不含类别前缀）
    pub fn detail(&self) -> &str {
        match self {
            TranslationError::InvalidInput(msg)
            | TranslationError::NetworkFailure(msg)
            | TranslationError::RemoteError(msg)
            | TranslationError::UnexpectedShape(msg)
            | TranslationError::SemanticMiss(msg)
            | TranslationError::ConfigError(msg) => msg,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let new_msg = format!("{} (上下文: {})", self.detail(), context);

        match self {
            TranslationError::InvalidInput(_) => TranslationError::InvalidInput(new_msg),
            TranslationError::NetworkFailure(_) => TranslationError::NetworkFailure(new_msg),
            TranslationError::RemoteError(_) => TranslationError::RemoteError(new_msg),
            TranslationError::UnexpectedShape(_) => TranslationError::UnexpectedShape(new_msg),
            TranslationError::SemanticMiss(_) => TranslationError::SemanticMiss(new_msg),
            TranslationError::ConfigError(_) => TranslationError::ConfigError(new_msg),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NetworkFailure,
    RemoteError,
    UnexpectedShape,
    SemanticMiss,
    Configuration,
}

/// 错误来源：产生错误的提供者，或入口校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
    InternalValidation,
    #[serde(untagged)]
    Provider(SourceTag),
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSource::InternalValidation => write!(f, "internal_validation"),
            ErrorSource::Provider(tag) => write!(f, "{}", tag),
        }
    }
}

/// 一次解析的最终失败：错误本身及其来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveFailure {
    pub error: TranslationError,
    pub source: ErrorSource,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (来源: {})", self.error, self.source)
    }
}

impl std::error::Error for ResolveFailure {}

impl ResolveFailure {
    pub fn new(error: TranslationError, source: ErrorSource) -> Self {
        Self { error, source }
    }

    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Self::new(
            TranslationError::InvalidInput(msg.to_string()),
            ErrorSource::InternalValidation,
        )
    }

    pub fn from_provider(error: TranslationError, tag: SourceTag) -> Self {
        Self::new(error, ErrorSource::Provider(tag))
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ConfigError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError, source: impl fmt::Display) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!(%source, "解析信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!(%source, "解析警告: {}", error),
            ErrorSeverity::Error => tracing::error!(%source, "解析错误: {}", error),
            ErrorSeverity::Critical => tracing::error!(%source, "解析严重错误: {}", error),
        }
    }

    /// 创建网络错误
    pub fn network_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::NetworkFailure(msg.to_string())
    }

    /// 创建远程服务错误
    pub fn remote_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::RemoteError(msg.to_string())
    }

    /// 创建形状错误
    pub fn shape_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::UnexpectedShape(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }
}
