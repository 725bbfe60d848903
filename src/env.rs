//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量读取

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl EnvError {
    fn new(variable: &str, message: impl Into<String>) -> Self {
        Self {
            variable: variable.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => match Self::DEFAULT {
                Some(default) => Ok(default),
                None => Err(EnvError::new(Self::NAME, "Required environment variable not set")),
            },
        }
    }

    /// 仅在变量被设置时返回值；未设置返回 `Ok(None)`
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "READOKU_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                )),
            }
        }
    }
}

/// 解析管道相关环境变量
pub mod resolver {
    use super::*;

    /// 词典查询API地址
    pub struct LookupUrl;
    impl EnvVar<String> for LookupUrl {
        const NAME: &'static str = "READOKU_LOOKUP_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Remote word-lookup endpoint (Jisho-compatible search API)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// 生成式代理地址
    pub struct ProxyUrl;
    impl EnvVar<String> for ProxyUrl {
        const NAME: &'static str = "READOKU_PROXY_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Generative proxy endpoint (POST /translate-gemini)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// 目标语言
    pub struct TargetLanguage;
    impl EnvVar<String> for TargetLanguage {
        const NAME: &'static str = "READOKU_TARGET_LANGUAGE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Target language sent to the generative proxy (ISO 639-1 code)";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim().to_lowercase();
            if lang.len() != 2 {
                return Err(EnvError::new(
                    Self::NAME,
                    "Language code must be 2 characters (ISO 639-1)",
                ));
            }
            Ok(lang)
        }
    }

    /// 词典文件路径
    pub struct DictionaryPath;
    impl EnvVar<String> for DictionaryPath {
        const NAME: &'static str = "READOKU_DICTIONARY_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the local dictionary JSON file";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError::new(Self::NAME, "Path cannot be empty"));
            }
            Ok(shellexpand::tilde(path).into_owned())
        }
    }

    /// 单词模式的提供者顺序
    pub struct WordStrategy;
    impl EnvVar<String> for WordStrategy {
        const NAME: &'static str = "READOKU_WORD_STRATEGY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Word-mode provider ordering: generative_first, local_first";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().replace('-', "_").as_str() {
                strategy @ ("generative_first" | "local_first") => Ok(strategy.to_string()),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!("Invalid strategy '{}'. Use: generative_first, local_first", value),
                )),
            }
        }
    }

    /// 请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "READOKU_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Provider HTTP request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 300)
        }
    }

    /// 最大输入长度
    pub struct MaxTextLength;
    impl EnvVar<usize> for MaxTextLength {
        const NAME: &'static str = "READOKU_MAX_TEXT_LENGTH";
        const DEFAULT: Option<usize> = Some(200);
        const DESCRIPTION: &'static str = "Maximum accepted input length in characters";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 10_000)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "READOKU_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(3600));
        const DESCRIPTION: &'static str = "Resolver cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 86400 * 7)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "READOKU_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError::new(Self::NAME, "Address cannot be empty"));
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "READOKU_WEB_PORT";
        const DEFAULT: Option<u16> = Some(5001);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            value
                .trim()
                .parse()
                .map_err(|_| EnvError::new(Self::NAME, "Must be a valid port number (1-65535)"))
        }
    }
}

/// 生成式模型上游相关环境变量
pub mod gemini {
    use super::*;

    /// API密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "GEMINI_API_KEY";
        const DEFAULT: Option<String> = None; // 无默认值，代理路由需要
        const DESCRIPTION: &'static str = "Generative model API key; proxy routes are disabled without it";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                return Err(EnvError::new(Self::NAME, "API key cannot be empty"));
            }
            Ok(key.to_string())
        }
    }

    /// 上游API基础地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "GEMINI_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Generative model API base URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// 模型名称
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "GEMINI_MODEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Generative model name";

        fn parse(value: &str) -> EnvResult<String> {
            let model = value.trim();
            if model.is_empty() || model.contains('/') {
                return Err(EnvError::new(Self::NAME, "Model name must be a single path segment"));
            }
            Ok(model.to_string())
        }
    }
}

/// 辅助函数
fn parse_http_url(value: &str, var_name: &str) -> EnvResult<String> {
    let url = value.trim();
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(EnvError::new(var_name, "URL must start with http:// or https://")),
    }
}

fn parse_seconds(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|_| EnvError::new(var_name, "Must be a valid number of seconds"))?;

    if seconds < min {
        return Err(EnvError::new(var_name, format!("Value {} is below minimum {}", seconds, min)));
    }

    if seconds > max {
        return Err(EnvError::new(var_name, format!("Value {} exceeds maximum {}", seconds, max)));
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value
        .trim()
        .parse()
        .map_err(|_| EnvError::new(var_name, "Must be a valid positive number"))?;

    if num < min {
        return Err(EnvError::new(var_name, format!("Value {} is below minimum {}", num, min)));
    }

    if num > max {
        return Err(EnvError::new(var_name, format!("Value {} exceeds maximum {}", num, max)));
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let rows: [(&str, &str); 14] = [
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION),
        (resolver::LookupUrl::NAME, resolver::LookupUrl::DESCRIPTION),
        (resolver::ProxyUrl::NAME, resolver::ProxyUrl::DESCRIPTION),
        (resolver::TargetLanguage::NAME, resolver::TargetLanguage::DESCRIPTION),
        (resolver::DictionaryPath::NAME, resolver::DictionaryPath::DESCRIPTION),
        (resolver::WordStrategy::NAME, resolver::WordStrategy::DESCRIPTION),
        (resolver::RequestTimeout::NAME, resolver::RequestTimeout::DESCRIPTION),
        (resolver::MaxTextLength::NAME, resolver::MaxTextLength::DESCRIPTION),
        (cache::Ttl::NAME, cache::Ttl::DESCRIPTION),
        (web::BindAddress::NAME, web::BindAddress::DESCRIPTION),
        (web::Port::NAME, web::Port::DESCRIPTION),
        (gemini::ApiKey::NAME, gemini::ApiKey::DESCRIPTION),
        (gemini::ApiUrl::NAME, gemini::ApiUrl::DESCRIPTION),
        (gemini::Model::NAME, gemini::Model::DESCRIPTION),
    ];

    let mut docs = String::from("# Environment Variables\n\n");
    for (name, description) in rows {
        docs.push_str(&format!("- `{}`: {}\n", name, description));
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(resolver::ProxyUrl::parse("http://localhost:5001/translate-gemini").is_ok());
        assert!(resolver::LookupUrl::parse("https://jisho.org/api/v1/search/words").is_ok());

        assert!(resolver::ProxyUrl::parse("ftp://example.com").is_err());
        assert!(resolver::ProxyUrl::parse("not-a-url").is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(resolver::WordStrategy::parse("local-first").unwrap(), "local_first");
        assert_eq!(
            resolver::WordStrategy::parse("GENERATIVE_FIRST").unwrap(),
            "generative_first"
        );
        assert!(resolver::WordStrategy::parse("random").is_err());
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(
            cache::Ttl::parse("60").unwrap(),
            Duration::from_secs(60)
        );
        assert!(cache::Ttl::parse("0").is_err());
        assert!(resolver::RequestTimeout::parse("1000").is_err());
        assert!(resolver::MaxTextLength::parse("abc").is_err());
    }

    #[test]
    fn test_env_docs_lists_variables() {
        let docs = generate_env_docs();
        assert!(docs.contains("READOKU_PROXY_URL"));
        assert!(docs.contains("GEMINI_API_KEY"));
    }
}
