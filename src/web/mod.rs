//! Web 服务器模块
//!
//! 对外提供解析API，并在配置了上游密钥时充当生成式代理

pub mod config;
pub mod gemini;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::config::ReadokuConfig;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::TranslationService;
use gemini::{GeminiClient, ProxyService};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    readoku_config: ReadokuConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, readoku_config: ReadokuConfig) -> Self {
        Self {
            config,
            readoku_config,
        }
    }

    /// 组装应用状态
    pub fn build_state(&self) -> TranslationResult<AppState> {
        let service = Arc::new(TranslationService::from_config(&self.readoku_config)?);
        let mut state = AppState::new(service);

        match &self.config.gemini_api_key {
            Some(api_key) => {
                let client = GeminiClient::from_config(&self.readoku_config, api_key.clone())?;
                let proxy = ProxyService::new(Arc::new(client), self.readoku_config.proxy_cache_size);
                state = state.with_proxy(Arc::new(proxy));
                tracing::info!(model = %self.readoku_config.gemini_model, "生成式代理已启用");
            }
            None => tracing::warn!("未设置 GEMINI_API_KEY，/translate-gemini 未挂载"),
        }

        Ok(state)
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> TranslationResult<()> {
        self.config
            .validate()
            .map_err(|e| helpers::config_error(e.to_string()))?;

        let app = create_router(Arc::new(self.build_state()?));

        let listener = tokio::net::TcpListener::bind(self.config.socket_addr())
            .await
            .map_err(|e| helpers::config_error(format!("Failed to bind server: {}", e)))?;

        tracing::info!("Web server starting at http://{}", self.config.socket_addr());

        axum::serve(listener, app)
            .await
            .map_err(|e| helpers::network_error(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes(app_state.proxy.is_some())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
