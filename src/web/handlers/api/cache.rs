//! 缓存管理API处理器

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::web::types::{AppState, CacheStatsResponse};

/// 获取缓存统计信息
pub async fn get_cache_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CacheStatsResponse>, (StatusCode, Json<Value>)> {
    let cache = state.service.cache();

    let proxy_entries = match &state.proxy {
        Some(proxy) => Some(proxy.cached_entries().await),
        None => None,
    };

    Ok(Json(CacheStatsResponse {
        ttl_secs: cache.ttl().as_secs(),
        cache: cache.stats(),
        service: state.service.stats().snapshot(),
        proxy_entries,
    }))
}

/// 清空解析缓存
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let deleted_count = state.service.cache().clear();
    tracing::info!(deleted_count, "解析缓存已清空");

    Ok(Json(json!({
        "success": true,
        "message": "解析缓存已清空",
        "deleted_count": deleted_count
    })))
}
