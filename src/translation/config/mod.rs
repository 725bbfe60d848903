//! 解析配置管理模块
//!
//! 支持 .env 文件、配置文件、环境变量和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, ReadokuConfig, WordStrategy};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 提供者地址
    pub const DEFAULT_LOOKUP_URL: &str = "https://jisho.org/api/v1/search/words";
    pub const DEFAULT_PROXY_URL: &str = "http://localhost:5001/translate-gemini";
    pub const DEFAULT_TARGET_LANGUAGE: &str = "ja";

    // 输入与网络
    pub const DEFAULT_MAX_TEXT_LENGTH: usize = 200;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    // 缓存设置
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600); // 1小时

    // 本地词典
    pub const DEFAULT_DICTIONARY_PATH: &str = "dictionary.json";

    // 生成式代理
    pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
    pub const DEFAULT_PROXY_CACHE_SIZE: usize = 500;

    // Web服务器
    pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 5001;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "readoku.toml",
        ".readoku.toml",
        "readoku.json",
        "~/.config/readoku/readoku.toml",
        "/etc/readoku/readoku.toml",
    ];

    // .env 文件，按优先级
    pub const ENV_FILES: &[&str] = &[".env.local", ".env.development", ".env.production", ".env"];
}

/// 加载配置，失败时退回默认配置
pub fn load_config() -> ReadokuConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            ReadokuConfig::default()
        }
    }
}
