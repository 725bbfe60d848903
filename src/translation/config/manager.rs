//! 配置管理器
//!
//! 加载顺序：.env 文件 → 配置文件（TOML/JSON） → 环境变量覆盖 → 校验

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 单词模式的提供者顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WordStrategy {
    /// 先问生成式代理，失败时用本地词典兜底
    #[default]
    GenerativeFirst,
    /// 本地词典 → 远程词典查询 → 生成式代理
    LocalFirst,
}

impl std::str::FromStr for WordStrategy {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "generative_first" => Ok(WordStrategy::GenerativeFirst),
            "local_first" => Ok(WordStrategy::LocalFirst),
            other => Err(TranslationError::ConfigError(format!(
                "未知的单词策略: {}",
                other
            ))),
        }
    }
}

/// 解析器配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReadokuConfig {
    // 提供者配置
    pub lookup_url: String,
    pub proxy_url: String,
    pub target_language: String,
    pub word_strategy: WordStrategy,
    pub request_timeout_secs: u64,
    pub max_text_length: usize,

    // 本地数据
    pub dictionary_path: String,
    pub cache_ttl_secs: u64,

    // 生成式代理上游
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub proxy_cache_size: usize,

    // Web服务器
    pub bind_address: String,
    pub port: u16,
}

impl Default for ReadokuConfig {
    fn default() -> Self {
        Self {
            lookup_url: constants::DEFAULT_LOOKUP_URL.to_string(),
            proxy_url: constants::DEFAULT_PROXY_URL.to_string(),
            target_language: constants::DEFAULT_TARGET_LANGUAGE.to_string(),
            word_strategy: WordStrategy::default(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_text_length: constants::DEFAULT_MAX_TEXT_LENGTH,

            dictionary_path: constants::DEFAULT_DICTIONARY_PATH.to_string(),
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),

            gemini_api_url: constants::DEFAULT_GEMINI_API_URL.to_string(),
            gemini_model: constants::DEFAULT_GEMINI_MODEL.to_string(),
            proxy_cache_size: constants::DEFAULT_PROXY_CACHE_SIZE,

            bind_address: constants::DEFAULT_BIND_ADDRESS.to_string(),
            port: constants::DEFAULT_PORT,
        }
    }
}

impl ReadokuConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        for (name, value) in [
            ("lookup_url", &self.lookup_url),
            ("proxy_url", &self.proxy_url),
            ("gemini_api_url", &self.gemini_api_url),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| TranslationError::ConfigError(format!("{} 无效: {}", name, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(TranslationError::ConfigError(format!(
                    "{} 必须使用 http 或 https",
                    name
                )));
            }
        }

        if self.target_language.len() != 2 {
            return Err(TranslationError::ConfigError(
                "目标语言必须是两位 ISO 639-1 代码".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时不能为0".to_string()));
        }

        if self.cache_ttl_secs == 0 {
            return Err(TranslationError::ConfigError("缓存TTL不能为0".to_string()));
        }

        if self.max_text_length == 0 {
            return Err(TranslationError::ConfigError("最大文本长度不能为0".to_string()));
        }

        if self.proxy_cache_size == 0 {
            return Err(TranslationError::ConfigError("代理缓存大小不能为0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{cache, gemini, resolver, web, EnvVar};

        if let Some(url) = resolver::LookupUrl::get_optional()? {
            self.lookup_url = url;
        }

        if let Some(url) = resolver::ProxyUrl::get_optional()? {
            tracing::info!("环境变量覆盖代理地址: {}", url);
            self.proxy_url = url;
        }

        if let Some(lang) = resolver::TargetLanguage::get_optional()? {
            self.target_language = lang;
        }

        if let Some(path) = resolver::DictionaryPath::get_optional()? {
            self.dictionary_path = path;
        }

        if let Some(strategy) = resolver::WordStrategy::get_optional()? {
            self.word_strategy = strategy.parse()?;
        }

        if let Some(timeout) = resolver::RequestTimeout::get_optional()? {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(max_len) = resolver::MaxTextLength::get_optional()? {
            self.max_text_length = max_len;
        }

        if let Some(ttl) = cache::Ttl::get_optional()? {
            self.cache_ttl_secs = ttl.as_secs();
        }

        if let Some(addr) = web::BindAddress::get_optional()? {
            self.bind_address = addr;
        }

        if let Some(port) = web::Port::get_optional()? {
            self.port = port;
        }

        if let Some(url) = gemini::ApiUrl::get_optional()? {
            self.gemini_api_url = url;
        }

        if let Some(model) = gemini::Model::get_optional()? {
            self.gemini_model = model;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// 生成式模型 generateContent 地址（不含密钥）
    pub fn gemini_endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.gemini_api_url.trim_end_matches('/'),
            self.gemini_model
        )
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: ReadokuConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = Self::load_config()?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件创建，仍应用环境变量覆盖
    pub fn from_file(path: &str) -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 取出合并后的配置
    pub fn into_config(self) -> ReadokuConfig {
        self.config
    }

    /// 查找并加载配置文件
    fn load_config() -> TranslationResult<ReadokuConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(ReadokuConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<ReadokuConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        Self::parse_config(path, &content)
    }

    /// 按扩展名解析：.toml 用 TOML，其余用 JSON
    pub fn parse_config(path: &str, content: &str) -> TranslationResult<ReadokuConfig> {
        if path.ends_with(".toml") {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let content = toml::to_string_pretty(&ReadokuConfig::default())
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReadokuConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.word_strategy, WordStrategy::GenerativeFirst);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = ConfigManager::parse_config(
            "readoku.toml",
            r#"
                proxy_url = "http://127.0.0.1:9000/translate-gemini"
                word_strategy = "local_first"
                cache_ttl_secs = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy_url, "http://127.0.0.1:9000/translate-gemini");
        assert_eq!(config.word_strategy, WordStrategy::LocalFirst);
        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.target_language, "ja");
    }

    #[test]
    fn test_parse_json_config() {
        let config =
            ConfigManager::parse_config("readoku.json", r#"{"max_text_length": 80}"#).unwrap();
        assert_eq!(config.max_text_length, 80);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ReadokuConfig::default();
        config.proxy_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = ReadokuConfig::default();
        config.cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        assert!(ConfigManager::parse_config("readoku.toml", "port = \"abc\"").is_err());
    }

    #[test]
    fn test_gemini_endpoint() {
        let config = ReadokuConfig::default();
        assert_eq!(
            config.gemini_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_word_strategy_from_str() {
        assert_eq!("local-first".parse::<WordStrategy>().unwrap(), WordStrategy::LocalFirst);
        assert!("whatever".parse::<WordStrategy>().is_err());
    }
}
