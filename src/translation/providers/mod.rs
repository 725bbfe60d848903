//! 提供者适配器
//!
//! 每个适配器把自己的响应解码为类型化的载荷，或返回带类别的错误值；
//! 编排器只根据返回值决定回退，从不检查载荷形状。

pub mod generative;
pub mod remote_lookup;

use async_trait::async_trait;

use crate::translation::error::TranslationResult;
use crate::translation::types::{Resolution, TranslationMode};

pub use generative::GenerativeProxyClient;
pub use remote_lookup::RemoteLookupClient;

/// 提供者结果
pub type ProviderResult = TranslationResult<Resolution>;

/// 远程词典查询（Jisho 风格的搜索API）
#[async_trait]
pub trait WordLookup: Send + Sync {
    /// 按规范化文本查询；空结果返回 `SemanticMiss`
    async fn lookup(&self, canonical: &str) -> ProviderResult;
}

/// 生成式翻译代理
#[async_trait]
pub trait GenerativeTranslator: Send + Sync {
    /// 发送保留原始大小写的文本
    async fn translate(&self, text: &str, mode: TranslationMode) -> ProviderResult;
}

/// 构建带超时的HTTP客户端
pub(crate) fn build_http_client(
    timeout: std::time::Duration,
) -> TranslationResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("readoku/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            crate::translation::error::helpers::config_error(format!("创建HTTP客户端失败: {}", e))
        })
}

/// 解析并校验端点地址
pub(crate) fn parse_endpoint(endpoint: &str) -> TranslationResult<url::Url> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        crate::translation::error::helpers::config_error(format!("端点地址无效 {}: {}", endpoint, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(crate::translation::error::helpers::config_error(format!(
            "端点必须使用 http 或 https: {}",
            endpoint
        )));
    }
    Ok(url)
}
