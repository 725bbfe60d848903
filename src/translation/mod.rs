//! 翻译解析模块
//!
//! 把用户选中的单词或短语解析为释义/译文载荷：
//! - **config**: 配置管理
//! - **core**: 规范化与解析编排器
//! - **providers**: 远程词典查询与生成式代理适配器
//! - **storage**: 解析缓存与本地词典
//! - **error**: 错误处理
//! - **types**: 请求、载荷与响应类型
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use readoku::translation::{load_config, TranslationRequest, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config();
//! let service = TranslationService::from_config(&config)?;
//!
//! let response = service.respond(&TranslationRequest::word("猫")).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod providers;
pub mod storage;
pub mod types;

pub use config::{load_config, ConfigManager, ReadokuConfig, WordStrategy};
pub use core::{normalize, CacheKey, TranslationService};
pub use error::{ErrorKind, ErrorSource, ResolveFailure, TranslationError, TranslationResult};
pub use providers::{GenerativeTranslator, ProviderResult, WordLookup};
pub use storage::{CacheStore, LexiconStore};
pub use types::{
    Resolution, RichEntry, SourceTag, TranslationMode, TranslationPayload, TranslationRequest,
    TranslationResponse,
};
