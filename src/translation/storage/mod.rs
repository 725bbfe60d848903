//! 存储模块
//!
//! 进程内的解析缓存与只读本地词典。

pub mod cache;
pub mod lexicon;

pub use cache::{CacheEntry, CacheStats, CacheStore, Clock, ManualClock, SystemClock};
pub use lexicon::{convert_tab_separated, LexiconStore};
