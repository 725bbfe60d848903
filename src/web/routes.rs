//! 路由配置

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::*;
use crate::web::types::AppState;

/// 创建所有路由；代理端点只在配置了上游时挂载
pub fn create_routes(proxy_enabled: bool) -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate))
        .route("/api/cache/stats", get(get_cache_stats))
        .route("/api/cache/clear", post(clear_cache));

    if proxy_enabled {
        router.route("/translate-gemini", post(translate_gemini))
    } else {
        router
    }
}
