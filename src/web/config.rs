//! Web 服务器配置
//!
//! 监听地址来自 `ReadokuConfig`（已合并环境变量覆盖），上游密钥只从环境变量读取。

use crate::env::{gemini, EnvError, EnvResult, EnvVar};
use crate::translation::config::ReadokuConfig;

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 生成式上游密钥；为空时不挂载代理端点
    pub gemini_api_key: Option<String>,
}

impl WebConfig {
    /// 从解析配置与环境变量创建
    pub fn from_config(config: &ReadokuConfig) -> EnvResult<Self> {
        let gemini_api_key = gemini::ApiKey::get_optional()?.filter(|key| !key.trim().is_empty());

        Ok(Self {
            bind_addr: config.bind_address.clone(),
            port: config.port,
            gemini_api_key,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "READOKU_WEB_BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "READOKU_WEB_PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        let config = ReadokuConfig::default();
        Self {
            bind_addr: config.bind_address,
            port: config.port,
            gemini_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WebConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr(), "127.0.0.1:5001");
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = WebConfig {
            port: 0,
            ..WebConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.variable, "READOKU_WEB_PORT");
    }
}
