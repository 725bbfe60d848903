//! # Readoku Library
//!
//! 把选中的单词或短语解析为释义或译文，带本地词典回退与内存缓存。
//!
//! ## 模块组织
//!
//! - `translation` - 规范化、提供者适配器、缓存与解析编排
//! - `env` - 类型化的环境变量
//! - `logging` - tracing 订阅器初始化
//! - `web` - 解析API与生成式代理（可选）

pub mod env;
pub mod logging;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

pub use translation::{
    load_config, ReadokuConfig, TranslationMode, TranslationRequest, TranslationResponse,
    TranslationService,
};
