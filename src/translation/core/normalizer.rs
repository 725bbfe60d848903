//! 输入规范化
//!
//! 规范键只用于缓存和词典查找；发往生成式提供者的仍是原始大小写文本

use crate::translation::types::TranslationMode;

/// 规范键：去除首尾空白并小写
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// 词典只收录单词，含空白的键直接跳过
pub fn is_single_word(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

/// 缓存键，包含模式，避免短语结果满足单词请求
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub mode: TranslationMode,
    pub canonical: String,
}

impl CacheKey {
    pub fn new(mode: TranslationMode, canonical: impl Into<String>) -> Self {
        Self {
            mode,
            canonical: canonical.into(),
        }
    }

    /// 由原始文本直接构造
    pub fn from_raw(mode: TranslationMode, raw: &str) -> Self {
        Self::new(mode, normalize(raw))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.mode, self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Dog "), "dog");
        assert_eq!(normalize("How Are You"), "how are you");
        assert_eq!(normalize("猫"), "猫");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_single_word_detection() {
        assert!(is_single_word("dog"));
        assert!(is_single_word("猫"));
        assert!(!is_single_word("how are you"));
        assert!(!is_single_word("ice\tcream"));
        assert!(!is_single_word(""));
    }

    #[test]
    fn test_cache_key_includes_mode() {
        let word = CacheKey::from_raw(TranslationMode::Word, "Hello");
        let phrase = CacheKey::from_raw(TranslationMode::Phrase, "hello");
        assert_ne!(word, phrase);
        assert_eq!(word.to_string(), "word:hello");
        assert_eq!(phrase.to_string(), "phrase:hello");
    }
}
