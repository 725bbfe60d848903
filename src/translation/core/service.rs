//! 解析编排器
//!
//! 每个请求的状态机：缓存检查 → 按模式选择提供者序列 → 失败回退 → 写缓存 → 响应。
//!
//! ## 单词模式
//!
//! - `GenerativeFirst`（默认）：生成式代理；失败时若本地词典有该词，以
//!   `local_fallback` 返回，否则传播代理的错误。
//! - `LocalFirst`：本地词典 → 远程词典查询 → 生成式代理。词典与远程查询只处理
//!   不含空白的单词；远程查询的空结果和失败都只推进到下一步。
//!
//! ## 短语模式
//!
//! 直接调用生成式代理，没有回退。
//!
//! 所有成功路径恰好写一次缓存；传播错误时不写。同一个键的并发请求不合并，
//! 可能重复调用提供者。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::normalizer::{is_single_word, normalize, CacheKey};
use crate::translation::config::{constants, ReadokuConfig, WordStrategy};
use crate::translation::error::{helpers, ResolveFailure, TranslationResult};
use crate::translation::providers::{
    GenerativeProxyClient, GenerativeTranslator, RemoteLookupClient, WordLookup,
};
use crate::translation::storage::{CacheStore, LexiconStore};
use crate::translation::types::{
    Resolution, SourceTag, TranslationMode, TranslationRequest, TranslationResponse,
};

/// 解析结果
pub type ResolveResult = Result<Resolution, ResolveFailure>;

/// 解析服务
pub struct TranslationService {
    cache: Arc<CacheStore>,
    lexicon: Arc<LexiconStore>,
    generative: Arc<dyn GenerativeTranslator>,
    remote_lookup: Option<Arc<dyn WordLookup>>,
    strategy: WordStrategy,
    max_text_length: usize,
    stats: ServiceStats,
}

/// 解析服务构建器
pub struct TranslationServiceBuilder {
    cache: Option<Arc<CacheStore>>,
    lexicon: Option<Arc<LexiconStore>>,
    generative: Arc<dyn GenerativeTranslator>,
    remote_lookup: Option<Arc<dyn WordLookup>>,
    strategy: WordStrategy,
    max_text_length: usize,
}

impl TranslationServiceBuilder {
    pub fn cache(mut self, cache: Arc<CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn lexicon(mut self, lexicon: Arc<LexiconStore>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn remote_lookup(mut self, lookup: Arc<dyn WordLookup>) -> Self {
        self.remote_lookup = Some(lookup);
        self
    }

    pub fn strategy(mut self, strategy: WordStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    pub fn build(self) -> TranslationService {
        TranslationService {
            cache: self.cache.unwrap_or_default(),
            lexicon: self.lexicon.unwrap_or_default(),
            generative: self.generative,
            remote_lookup: self.remote_lookup,
            strategy: self.strategy,
            max_text_length: self.max_text_length,
            stats: ServiceStats::default(),
        }
    }
}

impl TranslationService {
    /// 以生成式提供者为必需项开始构建
    pub fn builder(generative: Arc<dyn GenerativeTranslator>) -> TranslationServiceBuilder {
        TranslationServiceBuilder {
            cache: None,
            lexicon: None,
            generative,
            remote_lookup: None,
            strategy: WordStrategy::default(),
            max_text_length: constants::DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// 按配置创建真实的HTTP提供者，加载词典
    pub fn from_config(config: &ReadokuConfig) -> TranslationResult<Self> {
        let generative = Arc::new(GenerativeProxyClient::from_config(config)?);
        let remote_lookup = Arc::new(RemoteLookupClient::from_config(config)?);
        let dictionary_path = shellexpand::tilde(&config.dictionary_path);
        let lexicon = Arc::new(LexiconStore::load_or_empty(&*dictionary_path));
        let cache = Arc::new(CacheStore::with_ttl(config.cache_ttl()));

        tracing::info!(
            strategy = ?config.word_strategy,
            proxy = %config.proxy_url,
            lexicon_entries = lexicon.len(),
            "解析服务已初始化"
        );

        Ok(Self::builder(generative)
            .remote_lookup(remote_lookup)
            .lexicon(lexicon)
            .cache(cache)
            .strategy(config.word_strategy)
            .max_text_length(config.max_text_length)
            .build())
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    pub fn strategy(&self) -> WordStrategy {
        self.strategy
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// 解析请求并包装为展示层响应
    pub async fn respond(&self, request: &TranslationRequest) -> TranslationResponse {
        self.resolve(request).await.into()
    }

    /// 解析一个请求
    pub async fn resolve(&self, request: &TranslationRequest) -> ResolveResult {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        let text = request.text.trim();
        if text.is_empty() {
            tracing::warn!("拒绝空白输入");
            return Err(ResolveFailure::invalid_input("翻译文本为空"));
        }

        let length = text.chars().count();
        if length > self.max_text_length {
            tracing::warn!(length, max = self.max_text_length, "拒绝超长输入");
            return Err(ResolveFailure::invalid_input(format!(
                "文本长度 {} 超过上限 {}",
                length, self.max_text_length
            )));
        }

        let canonical = normalize(text);
        let key = CacheKey::new(request.mode, canonical.clone());

        if let Some(entry) = self.cache.get(&key) {
            tracing::info!(key = %key, source = %entry.source, "缓存命中");
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.to_resolution());
        }

        let result = match request.mode {
            TranslationMode::Word => match self.strategy {
                WordStrategy::GenerativeFirst => self.resolve_word_generative_first(text, &canonical).await,
                WordStrategy::LocalFirst => self.resolve_word_local_first(text, &canonical).await,
            },
            TranslationMode::Phrase => self.resolve_phrase(text).await,
        };

        match result {
            Ok(resolution) if !resolution.is_consistent() => {
                let failure = ResolveFailure::from_provider(
                    helpers::shape_error("载荷形状与来源标签不一致"),
                    resolution.source,
                );
                helpers::log_error(&failure.error, failure.source);
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                Err(failure)
            }
            Ok(resolution) => {
                tracing::info!(key = %key, source = %resolution.source, "解析成功，写入缓存");
                self.cache
                    .put(key, resolution.payload.clone(), resolution.source);
                Ok(resolution)
            }
            Err(failure) => {
                tracing::error!(key = %key, source = %failure.source, "解析失败: {}", failure.error);
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                Err(failure)
            }
        }
    }

    /// 生成式代理优先，本地词典兜底
    async fn resolve_word_generative_first(&self, text: &str, canonical: &str) -> ResolveResult {
        let failure = match self.call_generative(text, TranslationMode::Word).await {
            Ok(resolution) => return Ok(resolution),
            Err(failure) => failure,
        };
        helpers::log_error(&failure.error, failure.source);

        match self.lexicon.lookup(canonical) {
            Some(entry) => {
                tracing::warn!(canonical, "生成式代理失败，使用本地词典兜底");
                self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
                Ok(Resolution::rich(entry.clone(), SourceTag::LocalFallback))
            }
            None => Err(failure),
        }
    }

    /// 本地词典 → 远程词典查询 → 生成式代理
    async fn resolve_word_local_first(&self, text: &str, canonical: &str) -> ResolveResult {
        if let Some(entry) = self.lexicon.lookup(canonical) {
            tracing::info!(canonical, "本地词典命中");
            return Ok(Resolution::rich(entry.clone(), SourceTag::Local));
        }

        if let Some(lookup) = self.remote_lookup.as_ref().filter(|_| is_single_word(canonical)) {
            self.stats.lookup_calls.fetch_add(1, Ordering::Relaxed);
            match lookup.lookup(canonical).await {
                Ok(resolution) => return Ok(resolution),
                Err(error) if error.is_semantic_miss() => {
                    tracing::info!(canonical, "词典查询无结果，转向生成式代理");
                }
                Err(error) => helpers::log_error(&error, SourceTag::RemoteLookup),
            }
        }

        self.call_generative(text, TranslationMode::Word).await
    }

    /// 短语没有回退
    async fn resolve_phrase(&self, text: &str) -> ResolveResult {
        self.call_generative(text, TranslationMode::Phrase).await
    }

    /// 失败带上该模式下生成式提供者的来源标签
    async fn call_generative(&self, text: &str, mode: TranslationMode) -> ResolveResult {
        self.stats.generative_calls.fetch_add(1, Ordering::Relaxed);
        self.generative
            .translate(text, mode)
            .await
            .map_err(|error| ResolveFailure::from_provider(error, SourceTag::generative(mode)))
    }
}

/// 服务统计信息
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    generative_calls: AtomicU64,
    lookup_calls: AtomicU64,
    fallbacks: AtomicU64,
    failures: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub generative_calls: u64,
    pub lookup_calls: u64,
    pub fallbacks: u64,
    pub failures: u64,
}

impl ServiceStats {
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            generative_calls: self.generative_calls.load(Ordering::Relaxed),
            lookup_calls: self.lookup_calls.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
