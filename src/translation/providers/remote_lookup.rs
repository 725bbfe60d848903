//! 远程词典查询适配器
//!
//! `GET <endpoint>?keyword=<urlencoded>` → `{ "data": [ ... ] }`

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::{build_http_client, parse_endpoint, ProviderResult, WordLookup};
use crate::translation::config::ReadokuConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::types::{Resolution, RichEntry, SourceTag};

/// 与 encodeURIComponent 一致的保留字符
const KEYWORD_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
struct LookupResponse {
    data: Vec<LookupItem>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupItem {
    #[serde(default)]
    japanese: Vec<JapaneseForm>,
    #[serde(default)]
    senses: Vec<Sense>,
}

#[derive(Debug, Default, Deserialize)]
struct JapaneseForm {
    word: Option<String>,
    reading: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Sense {
    #[serde(default)]
    english_definitions: Vec<String>,
    #[serde(default)]
    parts_of_speech: Vec<String>,
}

impl From<LookupItem> for RichEntry {
    fn from(item: LookupItem) -> Self {
        let form = item.japanese.into_iter().next().unwrap_or_default();
        let sense = item.senses.into_iter().next().unwrap_or_default();

        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        RichEntry {
            reading_jp: form.word.or(form.reading),
            part_of_speech: non_empty(sense.parts_of_speech.join(", ")),
            definition_en: non_empty(sense.english_definitions.join("; ")),
            ..Default::default()
        }
    }
}

/// 解码2xx响应体
pub fn decode_lookup_body(keyword: &str, body: &[u8]) -> ProviderResult {
    let response: LookupResponse = serde_json::from_slice(body)
        .map_err(|e| helpers::shape_error(format!("词典查询响应无法解析: {}", e)))?;

    match response.data.into_iter().next() {
        Some(first) => Ok(Resolution::rich(first.into(), SourceTag::RemoteLookup)),
        None => Err(TranslationError::SemanticMiss(format!(
            "词典查询没有 '{}' 的结果",
            keyword
        ))),
    }
}

/// 远程词典查询客户端
pub struct RemoteLookupClient {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl RemoteLookupClient {
    pub fn new(endpoint: &str, timeout: Duration) -> TranslationResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: parse_endpoint(endpoint)?,
        })
    }

    pub fn from_config(config: &ReadokuConfig) -> TranslationResult<Self> {
        Self::new(&config.lookup_url, config.request_timeout())
    }

    /// 带 keyword 参数的请求地址
    pub fn request_url(&self, keyword: &str) -> url::Url {
        let mut url = self.endpoint.clone();
        let encoded = utf8_percent_encode(keyword, KEYWORD_ENCODE_SET).to_string();
        url.set_query(Some(&format!("keyword={}", encoded)));
        url
    }
}

#[async_trait]
impl WordLookup for RemoteLookupClient {
    async fn lookup(&self, canonical: &str) -> ProviderResult {
        let url = self.request_url(canonical);
        tracing::debug!(%url, "发起词典查询");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| helpers::network_error(format!("词典查询请求失败: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(helpers::remote_error(format!("词典查询返回 HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| helpers::network_error(format!("读取词典查询响应失败: {}", e)))?;

        decode_lookup_body(canonical, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::ErrorKind;

    #[test]
    fn test_decode_first_result() {
        let body = r#"{
            "data": [
                {
                    "slug": "猫",
                    "japanese": [{"word": "猫", "reading": "ねこ"}],
                    "senses": [
                        {"english_definitions": ["cat"], "parts_of_speech": ["Noun"]},
                        {"english_definitions": ["shamisen"], "parts_of_speech": ["Noun"]}
                    ]
                },
                {"japanese": [{"reading": "ネコ"}], "senses": []}
            ]
        }"#.as_bytes();

        let resolution = decode_lookup_body("猫", body).unwrap();
        assert_eq!(resolution.source, SourceTag::RemoteLookup);
        let entry = resolution.payload.as_rich().unwrap();
        assert_eq!(entry.reading_jp.as_deref(), Some("猫"));
        assert_eq!(entry.definition_en.as_deref(), Some("cat"));
        assert_eq!(entry.part_of_speech.as_deref(), Some("Noun"));
        assert!(entry.example_en.is_none());
    }

    #[test]
    fn test_reading_used_when_no_word() {
        let body = r#"{"data": [{"japanese": [{"reading": "すし"}],
            "senses": [{"english_definitions": ["sushi", "vinegared rice"], "parts_of_speech": []}]}]}"#.as_bytes();
        let resolution = decode_lookup_body("すし", body).unwrap();
        let entry = resolution.payload.as_rich().unwrap();
        assert_eq!(entry.reading_jp.as_deref(), Some("すし"));
        assert_eq!(entry.definition_en.as_deref(), Some("sushi; vinegared rice"));
        assert!(entry.part_of_speech.is_none());
    }

    #[test]
    fn test_empty_data_is_semantic_miss() {
        let err = decode_lookup_body("zzz", br#"{"data": []}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SemanticMiss);
    }

    #[test]
    fn test_malformed_body_is_shape_error() {
        let err = decode_lookup_body("x", b"<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedShape);

        let err = decode_lookup_body("x", br#"{"meta": {"status": 200}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedShape);
    }

    #[test]
    fn test_request_url_encodes_keyword() {
        let client = RemoteLookupClient::new(
            "https://jisho.org/api/v1/search/words",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.request_url("猫").as_str(),
            "https://jisho.org/api/v1/search/words?keyword=%E7%8C%AB"
        );
        assert_eq!(
            client.request_url("rice & beans").query(),
            Some("keyword=rice%20%26%20beans")
        );
    }
}
