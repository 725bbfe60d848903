//! 生成式代理端点

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::web::gemini::ProxyBody;
use crate::web::types::AppState;

/// `POST /translate-gemini`
pub async fn translate_gemini(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProxyBody>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Some(proxy) = state.proxy.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Generative proxy is not configured" })),
        );
    };

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!("代理请求体无效: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No prompt provided" })),
            );
        }
    };

    let (status, value) = proxy.handle(body).await;
    (status, Json(value))
}
