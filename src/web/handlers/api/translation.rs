//! 翻译解析API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::translation::error::{ErrorKind, ResolveFailure};
use crate::translation::types::{Resolution, TranslationRequest, TranslationResponse};
use crate::web::types::AppState;

/// 解析一个单词或短语
///
/// 成功返回200；输入无效（含无法解析的请求体）返回400；提供者失败返回502。
/// 响应体始终是 `TranslationResponse` 的形状。
pub async fn translate(
    State(state): State<Arc<AppState>>,
    body: Result<ExtractJson<TranslationRequest>, JsonRejection>,
) -> (StatusCode, Json<TranslationResponse>) {
    let request = match body {
        Ok(ExtractJson(request)) => request,
        Err(rejection) => {
            tracing::warn!("翻译请求体无效: {}", rejection.body_text());
            let failure = ResolveFailure::invalid_input(rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(TranslationResponse::from(Err::<Resolution, _>(failure))),
            );
        }
    };

    let result = state.service.resolve(&request).await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(failure) if failure.error.kind() == ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        Err(_) => StatusCode::BAD_GATEWAY,
    };

    (status, Json(result.into()))
}

/// 健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "word_strategy": state.service.strategy(),
        "lexicon_entries": state.service.lexicon().len(),
        "proxy_enabled": state.proxy.is_some(),
    }))
}
