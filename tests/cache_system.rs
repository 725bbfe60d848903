//! 缓存系统集成测试
//!
//! 有效期、覆盖写入与统计

use std::sync::Arc;
use std::time::Duration;

use readoku::translation::core::CacheKey;
use readoku::translation::storage::CacheStore;
use readoku::translation::types::{RichEntry, SourceTag, TranslationMode, TranslationPayload};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{cache_with_clock, manual_clock, TEST_TTL};

fn rich(definition: &str) -> TranslationPayload {
    TranslationPayload::Rich(RichEntry::definition(definition))
}

/// 测试基本缓存操作
#[tokio::test]
async fn test_basic_cache_operations() {
    let cache = CacheStore::with_ttl(TEST_TTL);
    let key = CacheKey::from_raw(TranslationMode::Word, "  Hello ");

    assert!(cache.get(&key).is_none(), "Cache should be empty initially");

    cache.put(key.clone(), rich("greeting"), SourceTag::GenerativeStructured);

    let entry = cache.get(&key).expect("Cache item should be found");
    assert_eq!(entry.payload, rich("greeting"));
    assert_eq!(entry.source, SourceTag::GenerativeStructured);

    let stats = cache.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.total_entries, 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

/// 测试过期边界
#[tokio::test]
async fn test_entry_expires_at_ttl() {
    let clock = manual_clock();
    let cache = cache_with_clock(clock.clone());
    let key = CacheKey::from_raw(TranslationMode::Word, "猫");

    cache.put(key.clone(), rich("cat"), SourceTag::GenerativeStructured);

    clock.advance(Duration::from_secs(3599));
    assert!(cache.get(&key).is_some());

    clock.advance(Duration::from_secs(1));
    assert!(cache.get(&key).is_none(), "Entry aged exactly the TTL is expired");
    assert_eq!(cache.len(), 0, "Expired entry is removed on read");
    assert_eq!(cache.stats().expired_evictions, 1);
}

/// 覆盖写入刷新时间戳
#[tokio::test]
async fn test_overwrite_refreshes_timestamp() {
    let clock = manual_clock();
    let cache = cache_with_clock(clock.clone());
    let key = CacheKey::from_raw(TranslationMode::Phrase, "good morning");

    cache.put(key.clone(), TranslationPayload::Plain("おはよう".into()), SourceTag::GenerativeSimple);
    clock.advance(Duration::from_secs(3000));
    cache.put(
        key.clone(),
        TranslationPayload::Plain("おはようございます".into()),
        SourceTag::GenerativeSimple,
    );
    clock.advance(Duration::from_secs(3000));

    let entry = cache.get(&key).expect("rewritten entry is still fresh");
    assert_eq!(entry.payload.as_plain(), Some("おはようございます"));
    assert_eq!(cache.len(), 1);
}

/// 模式是键的一部分
#[tokio::test]
async fn test_mode_separates_slots() {
    let cache = CacheStore::with_ttl(TEST_TTL);
    let word = CacheKey::from_raw(TranslationMode::Word, "thanks");
    let phrase = CacheKey::from_raw(TranslationMode::Phrase, "thanks");

    cache.put(word.clone(), rich("gratitude"), SourceTag::GenerativeStructured);
    assert!(cache.get(&phrase).is_none());

    cache.put(phrase.clone(), TranslationPayload::Plain("ありがとう".into()), SourceTag::GenerativeSimple);
    assert_eq!(cache.get(&word).unwrap().source, SourceTag::GenerativeStructured);
    assert_eq!(cache.get(&phrase).unwrap().source, SourceTag::GenerativeSimple);
}

/// 清空返回删除数量
#[tokio::test]
async fn test_clear() {
    let cache = CacheStore::with_ttl(TEST_TTL);
    for word in ["a", "b", "c"] {
        cache.put(CacheKey::from_raw(TranslationMode::Word, word), rich(word), SourceTag::Local);
    }

    assert_eq!(cache.clear(), 3);
    assert!(cache.is_empty());
    assert_eq!(cache.clear(), 0);
}

/// 并发读写
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access() {
    let cache = Arc::new(CacheStore::with_ttl(TEST_TTL));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                let key = CacheKey::from_raw(TranslationMode::Word, &format!("word{}", i % 4));
                cache.put(key.clone(), rich("x"), SourceTag::GenerativeStructured);
                cache.get(&key).is_some()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.expect("task completes"));
    }
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.stats().writes, 16);
}
