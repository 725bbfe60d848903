//! 解析核心模块
//!
//! - **normalizer**: 规范键与缓存键
//! - **service**: 解析编排器，连接缓存、词典与各提供者
//!
//! ## 模块依赖关系
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── CacheStore (storage/cache.rs)
//!     ├── LexiconStore (storage/lexicon.rs)
//!     ├── GenerativeTranslator (providers/generative.rs)
//!     └── WordLookup (providers/remote_lookup.rs)
//! ```

pub mod normalizer;
pub mod service;

pub use normalizer::{is_single_word, normalize, CacheKey};
pub use service::{
    ResolveResult, ServiceStats, ServiceStatsSnapshot, TranslationService,
    TranslationServiceBuilder,
};
