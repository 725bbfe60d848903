//! 本地词典
//!
//! 启动时从JSON文件加载一次，之后只读。加载失败时退化为总是未命中的空词典。

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::translation::core::normalizer::{is_single_word, normalize};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::types::RichEntry;

/// 词典文件中的条目：结构化对象，或转换脚本生成的纯释义字符串
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LexiconValue {
    Rich(RichEntry),
    Definition(String),
}

impl From<LexiconValue> for RichEntry {
    fn from(value: LexiconValue) -> Self {
        match value {
            LexiconValue::Rich(entry) => entry,
            LexiconValue::Definition(text) => RichEntry::definition(text),
        }
    }
}

/// 只读词典
#[derive(Debug, Default, Clone)]
pub struct LexiconStore {
    entries: HashMap<String, RichEntry>,
}

impl LexiconStore {
    /// 空词典
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, RichEntry)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(word, entry)| (normalize(word.as_ref()), entry))
                .collect(),
        }
    }

    /// 解析JSON对象 `word -> entry`
    pub fn from_json_str(json: &str) -> TranslationResult<Self> {
        let raw: HashMap<String, LexiconValue> = serde_json::from_str(json)
            .map_err(|e| TranslationError::ConfigError(format!("词典JSON无效: {}", e)))?;

        Ok(Self::from_entries(
            raw.into_iter().map(|(word, value)| (word, RichEntry::from(value))),
        ))
    }

    /// 从文件加载，失败时返回错误
    pub fn try_load(path: impl AsRef<Path>) -> TranslationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取词典文件失败 {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// 从文件加载，失败时记录警告并退化为空词典
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(lexicon) => {
                tracing::info!(path = %path.display(), entries = lexicon.len(), "词典加载成功");
                lexicon
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "词典加载失败，本地查找将总是未命中: {}", e);
                Self::empty()
            }
        }
    }

    /// 按规范键查找；含空白的键不查
    pub fn lookup(&self, key: &str) -> Option<&RichEntry> {
        if !is_single_word(key) {
            return None;
        }
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 将 `word<TAB>definition` 格式的词表转换为词典映射
///
/// 字段数不是2的行会被跳过；单词保持原样，规范化在加载时进行。
pub fn convert_tab_separated(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.trim().split('\t');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(word), Some(definition), None) => {
                    Some((word.to_string(), definition.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}
