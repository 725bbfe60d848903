//! 解析管道的核心数据类型

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::translation::error::{ErrorSource, ResolveFailure};

/// 翻译模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// 单词：期望结构化释义
    #[default]
    Word,
    /// 短语：期望纯文本译文
    Phrase,
}

impl TranslationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMode::Word => "word",
            TranslationMode::Phrase => "phrase",
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" => Ok(TranslationMode::Word),
            "phrase" => Ok(TranslationMode::Phrase),
            other => Err(format!("未知的翻译模式 '{}'，可选: word, phrase", other)),
        }
    }
}

/// 翻译请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    #[serde(default)]
    pub mode: TranslationMode,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, mode: TranslationMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(text, TranslationMode::Word)
    }

    pub fn phrase(text: impl Into<String>) -> Self {
        Self::new(text, TranslationMode::Phrase)
    }
}

/// 结构化词条，所有字段可选，缺失表示下游省略该部分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_jp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_romaji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_jp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_jp: Option<String>,
}

impl RichEntry {
    /// 生成式模型被要求返回的字段名
    pub const FIELDS: [&'static str; 7] = [
        "reading_jp",
        "reading_romaji",
        "part_of_speech",
        "definition_en",
        "explanation_jp",
        "example_en",
        "example_jp",
    ];

    /// 只含英文释义的词条
    pub fn definition(definition_en: impl Into<String>) -> Self {
        Self {
            definition_en: Some(definition_en.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reading_jp.is_none()
            && self.reading_romaji.is_none()
            && self.part_of_speech.is_none()
            && self.definition_en.is_none()
            && self.explanation_jp.is_none()
            && self.example_en.is_none()
            && self.example_jp.is_none()
    }
}

/// 翻译结果载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationPayload {
    Rich(RichEntry),
    Plain(String),
}

impl TranslationPayload {
    pub fn as_rich(&self) -> Option<&RichEntry> {
        match self {
            TranslationPayload::Rich(entry) => Some(entry),
            TranslationPayload::Plain(_) => None,
        }
    }

    pub fn as_plain(&self) -> Option<&str> {
        match self {
            TranslationPayload::Plain(text) => Some(text),
            TranslationPayload::Rich(_) => None,
        }
    }
}

/// 结果来源标签，渲染层据此分派
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Local,
    LocalFallback,
    RemoteLookup,
    GenerativeStructured,
    GenerativeSimple,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Local => "local",
            SourceTag::LocalFallback => "local_fallback",
            SourceTag::RemoteLookup => "remote_lookup",
            SourceTag::GenerativeStructured => "generative_structured",
            SourceTag::GenerativeSimple => "generative_simple",
        }
    }

    /// 该来源对应的载荷形状是否为纯文本
    pub fn expects_plain(&self) -> bool {
        matches!(self, SourceTag::GenerativeSimple)
    }

    /// 生成式提供者在给定模式下的来源标签
    pub fn generative(mode: TranslationMode) -> Self {
        match mode {
            TranslationMode::Word => SourceTag::GenerativeStructured,
            TranslationMode::Phrase => SourceTag::GenerativeSimple,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 提供者成功结果：载荷与来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub payload: TranslationPayload,
    pub source: SourceTag,
}

impl Resolution {
    pub fn rich(entry: RichEntry, source: SourceTag) -> Self {
        Self {
            payload: TranslationPayload::Rich(entry),
            source,
        }
    }

    pub fn plain(text: impl Into<String>, source: SourceTag) -> Self {
        Self {
            payload: TranslationPayload::Plain(text.into()),
            source,
        }
    }

    /// 载荷形状与来源标签是否一致
    pub fn is_consistent(&self) -> bool {
        self.source.expects_plain() == matches!(self.payload, TranslationPayload::Plain(_))
    }
}

/// 交给展示层的响应：`{translation, source}` 或 `{error, source}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationResponse {
    Translation {
        translation: TranslationPayload,
        source: SourceTag,
    },
    Error {
        error: String,
        source: ErrorSource,
    },
}

impl TranslationResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, TranslationResponse::Error { .. })
    }
}

impl From<Result<Resolution, ResolveFailure>> for TranslationResponse {
    fn from(result: Result<Resolution, ResolveFailure>) -> Self {
        match result {
            Ok(resolution) => TranslationResponse::Translation {
                translation: resolution.payload,
                source: resolution.source,
            },
            Err(failure) => TranslationResponse::Error {
                error: failure.error.to_string(),
                source: failure.source,
            },
        }
    }
}
