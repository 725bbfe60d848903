//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::Serialize;

use crate::translation::core::{ServiceStatsSnapshot, TranslationService};
use crate::translation::storage::CacheStats;
use crate::web::gemini::ProxyService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    /// 只有配置了 GEMINI_API_KEY 时存在
    pub proxy: Option<Arc<ProxyService>>,
}

impl AppState {
    pub fn new(service: Arc<TranslationService>) -> Self {
        Self {
            service,
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: Arc<ProxyService>) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// 缓存统计响应
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub ttl_secs: u64,
    pub cache: CacheStats,
    pub service: ServiceStatsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_entries: Option<usize>,
}
