//! 生成式代理适配器
//!
//! `POST <endpoint>`，请求体 `{prompt, targetLanguage, translationMode}`。
//! 单词模式要求响应本身是结构化对象，短语模式要求 `translatedText` 字符串。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::{build_http_client, parse_endpoint, GenerativeTranslator, ProviderResult};
use crate::translation::config::ReadokuConfig;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::types::{Resolution, RichEntry, SourceTag, TranslationMode};

/// 代理请求体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest<'a> {
    pub prompt: &'a str,
    pub target_language: &'a str,
    pub translation_mode: TranslationMode,
}

/// 响应体中的错误信息：errorMessage 优先，其次 error
fn error_message(body: &Value) -> Option<String> {
    ["errorMessage", "error"].iter().find_map(|field| match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(msg)) => Some(msg.clone()),
        Some(other) => Some(other.to_string()),
    })
}

/// 将代理响应解码为类型化结果
pub fn decode_proxy_response(status: StatusCode, body: &[u8], mode: TranslationMode) -> ProviderResult {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(error_message)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        return Err(helpers::remote_error(format!(
            "代理请求失败: {} {}",
            status.as_u16(),
            message
        )));
    }

    let body = parsed.ok_or_else(|| helpers::shape_error("代理响应不是有效的JSON"))?;

    if let Some(message) = error_message(&body) {
        return Err(helpers::remote_error(message));
    }

    match mode {
        TranslationMode::Word => decode_structured(body),
        TranslationMode::Phrase => match body.get("translatedText") {
            Some(Value::String(text)) => Ok(Resolution::plain(text.clone(), SourceTag::GenerativeSimple)),
            _ => Err(helpers::shape_error("短语模式响应缺少 translatedText 字符串")),
        },
    }
}

fn decode_structured(body: Value) -> ProviderResult {
    if !body.is_object() {
        return Err(helpers::shape_error("单词模式响应不是结构化对象"));
    }

    let entry: RichEntry = serde_json::from_value(body)
        .map_err(|e| helpers::shape_error(format!("单词模式响应字段类型不符: {}", e)))?;

    if entry.is_empty() {
        return Err(helpers::shape_error("单词模式响应不含任何词条字段"));
    }

    Ok(Resolution::rich(entry, SourceTag::GenerativeStructured))
}

/// 生成式代理客户端
pub struct GenerativeProxyClient {
    client: reqwest::Client,
    endpoint: url::Url,
    target_language: String,
}

impl GenerativeProxyClient {
    pub fn new(endpoint: &str, target_language: &str, timeout: Duration) -> TranslationResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: parse_endpoint(endpoint)?,
            target_language: target_language.to_string(),
        })
    }

    pub fn from_config(config: &ReadokuConfig) -> TranslationResult<Self> {
        Self::new(&config.proxy_url, &config.target_language, config.request_timeout())
    }
}

#[async_trait]
impl GenerativeTranslator for GenerativeProxyClient {
    async fn translate(&self, text: &str, mode: TranslationMode) -> ProviderResult {
        let request = ProxyRequest {
            prompt: text,
            target_language: &self.target_language,
            translation_mode: mode,
        };
        tracing::debug!(endpoint = %self.endpoint, %mode, "调用生成式代理");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| helpers::network_error(format!("生成式代理请求失败: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| helpers::network_error(format!("读取生成式代理响应失败: {}", e)))?;

        decode_proxy_response(status, &body, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::ErrorKind;

    #[test]
    fn test_request_body_shape() {
        let request = ProxyRequest {
            prompt: "How are you",
            target_language: "ja",
            translation_mode: TranslationMode::Phrase,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "prompt": "How are you",
                "targetLanguage": "ja",
                "translationMode": "phrase"
            })
        );
    }

    #[test]
    fn test_word_mode_structured_object() {
        let body = r#"{"reading_jp": "猫", "reading_romaji": "neko", "definition_en": "cat"}"#.as_bytes();
        let resolution = decode_proxy_response(StatusCode::OK, body, TranslationMode::Word).unwrap();
        assert_eq!(resolution.source, SourceTag::GenerativeStructured);
        assert_eq!(
            resolution.payload.as_rich().and_then(|e| e.reading_romaji.as_deref()),
            Some("neko")
        );
    }

    #[test]
    fn test_word_mode_rejects_other_shapes() {
        for body in [
            r#"{"translatedText": "ねこ"}"#.as_bytes(),
            &br#"["cat"]"#[..],
            &br#""cat""#[..],
            &br#"{"definition_en": 42}"#[..],
            &b"not json"[..],
        ] {
            let err = decode_proxy_response(StatusCode::OK, body, TranslationMode::Word).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedShape, "body: {:?}", body);
        }
    }

    #[test]
    fn test_phrase_mode_translated_text() {
        let resolution = decode_proxy_response(
            StatusCode::OK,
            r#"{"translatedText": "お元気ですか"}"#.as_bytes(),
            TranslationMode::Phrase,
        )
        .unwrap();
        assert_eq!(resolution.source, SourceTag::GenerativeSimple);
        assert_eq!(resolution.payload.as_plain(), Some("お元気ですか"));

        let err = decode_proxy_response(
            StatusCode::OK,
            r#"{"reading_jp": "猫"}"#.as_bytes(),
            TranslationMode::Phrase,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedShape);
    }

    #[test]
    fn test_error_field_is_remote_error() {
        let err = decode_proxy_response(
            StatusCode::OK,
            br#"{"errorMessage": "quota exceeded"}"#,
            TranslationMode::Phrase,
        )
        .unwrap_err();
        assert_eq!(err, helpers::remote_error("quota exceeded"));
    }

    #[test]
    fn test_non_success_status() {
        let err = decode_proxy_response(
            StatusCode::BAD_GATEWAY,
            br#"{"error": "Gemini returned invalid JSON for word translation"}"#,
            TranslationMode::Word,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteError);
        assert!(err.detail().contains("502"));
        assert!(err.detail().contains("invalid JSON"));

        let err = decode_proxy_response(StatusCode::INTERNAL_SERVER_ERROR, b"", TranslationMode::Word)
            .unwrap_err();
        assert!(err.detail().contains("Internal Server Error"));
    }
}
