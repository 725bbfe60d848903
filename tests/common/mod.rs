// 集成测试公共模块
//
// 提供可编排的假提供者和服务构建辅助

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use readoku::translation::config::WordStrategy;
use readoku::translation::error::TranslationError;
use readoku::translation::providers::{GenerativeTranslator, ProviderResult, WordLookup};
use readoku::translation::storage::{CacheStore, LexiconStore, ManualClock};
use readoku::translation::types::{Resolution, RichEntry, SourceTag, TranslationMode};
use readoku::translation::TranslationService;

/// 缓存有效期
pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// 返回固定结果并记录调用的生成式提供者
pub struct FakeGenerative {
    reply: Mutex<ProviderResult>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, TranslationMode)>>,
}

impl FakeGenerative {
    pub fn replying(reply: ProviderResult) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn rich(definition: &str) -> Arc<Self> {
        Self::replying(Ok(Resolution::rich(
            RichEntry::definition(definition),
            SourceTag::GenerativeStructured,
        )))
    }

    pub fn plain(text: &str) -> Arc<Self> {
        Self::replying(Ok(Resolution::plain(text, SourceTag::GenerativeSimple)))
    }

    pub fn failing(error: TranslationError) -> Arc<Self> {
        Self::replying(Err(error))
    }

    pub fn set_reply(&self, reply: ProviderResult) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, TranslationMode)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeTranslator for FakeGenerative {
    async fn translate(&self, text: &str, mode: TranslationMode) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((text.to_string(), mode));
        self.reply.lock().unwrap().clone()
    }
}

/// 返回固定结果并记录调用的词典查询
pub struct FakeLookup {
    reply: ProviderResult,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn replying(reply: ProviderResult) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn found(definition: &str) -> Arc<Self> {
        Self::replying(Ok(Resolution::rich(
            RichEntry::definition(definition),
            SourceTag::RemoteLookup,
        )))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordLookup for FakeLookup {
    async fn lookup(&self, canonical: &str) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(canonical.to_string());
        self.reply.clone()
    }
}

/// 由 (单词, 释义) 构造词典
pub fn lexicon(entries: &[(&str, &str)]) -> Arc<LexiconStore> {
    Arc::new(LexiconStore::from_entries(
        entries
            .iter()
            .map(|(word, definition)| (*word, RichEntry::definition(*definition))),
    ))
}

/// 固定起点的手动时钟
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
}

/// 使用手动时钟的缓存
pub fn cache_with_clock(clock: Arc<ManualClock>) -> Arc<CacheStore> {
    Arc::new(CacheStore::with_clock(TEST_TTL, clock))
}

/// 生成式优先的服务
pub fn generative_first_service(
    generative: Arc<FakeGenerative>,
    lexicon: Arc<LexiconStore>,
) -> TranslationService {
    TranslationService::builder(generative)
        .lexicon(lexicon)
        .strategy(WordStrategy::GenerativeFirst)
        .build()
}

/// 本地优先的服务
pub fn local_first_service(
    generative: Arc<FakeGenerative>,
    lookup: Arc<FakeLookup>,
    lexicon: Arc<LexiconStore>,
) -> TranslationService {
    TranslationService::builder(generative)
        .remote_lookup(lookup)
        .lexicon(lexicon)
        .strategy(WordStrategy::LocalFirst)
        .build()
}
