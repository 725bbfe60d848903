//! 翻译缓存模块
//!
//! 进程内缓存，读取时检查过期并惰性删除；没有容量上限，也没有后台清理。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::translation::config::constants;
use crate::translation::core::normalizer::CacheKey;
use crate::translation::types::{Resolution, SourceTag, TranslationPayload};

// ============================================================================
// 时钟
// ============================================================================

/// 时间来源，测试中可替换为手动时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手动推进的时钟，用于模拟过期
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// 向前推进时间
    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload: TranslationPayload,
    pub source: SourceTag,
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    /// 条目年龄达到TTL即视为过期
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.inserted_at).to_std() {
            Ok(age) => age >= ttl,
            // 插入时间在未来（时钟回拨），视为新鲜
            Err(_) => false,
        }
    }

    pub fn to_resolution(&self) -> Resolution {
        Resolution {
            payload: self.payload.clone(),
            source: self.source,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub expired_evictions: u64,
    pub writes: u64,
    pub total_entries: usize,
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug, Default)]
struct AtomicStats {
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    expired_evictions: AtomicU64,
    writes: AtomicU64,
}

/// 解析结果缓存
pub struct CacheStore {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: AtomicStats,
}

impl CacheStore {
    /// 使用系统时钟和默认TTL（1小时）
    pub fn new() -> Self {
        Self::with_clock(constants::DEFAULT_CACHE_TTL, Arc::new(SystemClock))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
            stats: AtomicStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 获取未过期的条目；过期条目在此删除
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value().clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // 读锁已释放；只删除仍然过期的条目，避免误删并发写入的新值
            let ttl = self.ttl;
            if self
                .entries
                .remove_if(key, |_, entry| entry.is_expired(now, ttl))
                .is_some()
            {
                self.stats.expired_evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "缓存条目已过期并删除");
            }
        }

        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// 无条件覆盖写入，以当前时间打戳
    pub fn put(&self, key: CacheKey, payload: TranslationPayload, source: SourceTag) {
        let entry = CacheEntry {
            payload,
            source,
            inserted_at: self.clock.now(),
        };
        self.entries.insert(key, entry);
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// 当前条目数（含尚未被读取淘汰的过期条目）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空缓存，返回删除的条目数
    pub fn clear(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_requests: self.stats.total_requests.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.stats.cache_misses.load(Ordering::Relaxed),
            expired_evictions: self.stats.expired_evictions.load(Ordering::Relaxed),
            writes: self.stats.writes.load(Ordering::Relaxed),
            total_entries: self.entries.len(),
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
