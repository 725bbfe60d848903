//! 生成式模型上游与代理逻辑
//!
//! 代理端点按模式构造提示词，调用上游 generateContent，并把模型输出整理成
//! 解析器期望的形状：单词模式返回模型生成的JSON对象，短语模式返回
//! `{"translatedText": ...}`。成功结果放入有界LRU缓存。

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use lru::LruCache;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::translation::config::ReadokuConfig;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::providers::build_http_client;
use crate::translation::types::RichEntry;

/// 上游调用错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// 上游返回非2xx
    #[error("upstream HTTP {status}")]
    Http { status: u16, body: String },

    /// 没有得到响应
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// 2xx但响应体不是JSON
    #[error("upstream returned invalid JSON: {0}")]
    InvalidBody(String),
}

/// 生成内容的上游
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, payload: &Value) -> Result<Value, UpstreamError>;
}

/// Gemini generateContent 客户端
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(helpers::config_error("GEMINI_API_KEY 为空"));
        }

        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &ReadokuConfig, api_key: String) -> TranslationResult<Self> {
        Self::new(config.gemini_endpoint(), api_key, config.request_timeout())
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, payload: &Value) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(payload)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

/// 代理请求体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyBody {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub translation_mode: Option<String>,
}

/// 构造单词模式提示词
pub fn word_prompt(word: &str) -> String {
    format!(
        "Translate the Japanese word \"{word}\" and give:\n\
         1. its written form in Japanese\n\
         2. its romaji reading\n\
         3. its part of speech\n\
         4. an English definition\n\
         5. a short explanation in simple Japanese\n\
         6. one simple example sentence in English\n\
         7. the same example sentence in Japanese\n\
         Respond with a single JSON object using exactly these keys: {keys}",
        word = word,
        keys = RichEntry::FIELDS.join(", ")
    )
}

/// 构造短语模式提示词
pub fn phrase_prompt(text: &str) -> String {
    format!(
        "Translate the following text to Japanese. Reply with the Japanese translation only, \
         without explanations or breakdowns: \"{}\"",
        text
    )
}

/// 上游请求体
pub fn generate_payload(prompt: &str, json_output: bool) -> Value {
    let mut payload = json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });
    if json_output {
        payload["generationConfig"] = json!({ "responseMimeType": "application/json" });
    }
    payload
}

/// 取出第一个候选的文本
pub fn candidate_text(response: &Value) -> Option<&str> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// 生成式代理服务
pub struct ProxyService {
    generator: Arc<dyn ContentGenerator>,
    cache: Mutex<LruCache<(String, String), Value>>,
}

impl ProxyService {
    pub fn new(generator: Arc<dyn ContentGenerator>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            generator,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// 处理一次代理请求，返回HTTP状态和JSON响应体
    pub async fn handle(&self, body: ProxyBody) -> (StatusCode, Value) {
        let prompt = body.prompt.trim().to_string();
        if prompt.is_empty() {
            return (StatusCode::BAD_REQUEST, json!({ "error": "No prompt provided" }));
        }

        let mode = body
            .translation_mode
            .unwrap_or_else(|| "word".to_string());
        let cache_key = (prompt.clone(), mode.clone());

        if let Some(cached) = self.cache.lock().await.get(&cache_key) {
            tracing::info!(%prompt, %mode, "代理缓存命中");
            return (StatusCode::OK, cached.clone());
        }
        tracing::info!(%prompt, %mode, "代理缓存未命中");

        let word_mode = mode == "word";
        let prompt_text = if word_mode {
            word_prompt(&prompt)
        } else {
            phrase_prompt(&prompt)
        };

        let response = match self.generator.generate(&generate_payload(&prompt_text, word_mode)).await {
            Ok(response) => response,
            Err(UpstreamError::Http { status, body }) => {
                tracing::error!(status, "上游HTTP错误");
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                return (
                    status,
                    json!({ "error": format!("upstream HTTP {}", status), "response_content": body }),
                );
            }
            Err(e) => {
                tracing::error!("调用上游失败: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }));
            }
        };

        let Some(text) = candidate_text(&response) else {
            tracing::error!("上游响应中没有候选文本");
            return (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": "No translation text received from upstream model",
                    "raw_gemini_response": response
                }),
            );
        };

        let result = if word_mode {
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("模型返回的单词JSON无效: {}", e);
                    return (
                        StatusCode::BAD_GATEWAY,
                        json!({
                            "error": "Upstream model returned invalid JSON for word translation",
                            "details": e.to_string(),
                            "raw_gemini_text": text
                        }),
                    );
                }
            }
        } else {
            json!({ "translatedText": text.trim() })
        };

        self.cache.lock().await.put(cache_key, result.clone());
        (StatusCode::OK, result)
    }
}
