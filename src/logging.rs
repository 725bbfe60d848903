//! 日志初始化

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::env::{core::LogLevel, EnvVar};

/// 安装全局 fmt 订阅器
///
/// `RUST_LOG` 优先；否则使用 `READOKU_LOG_LEVEL`（默认 info）。重复调用无效果。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = LogLevel::get().unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!("readoku={level},tower_http=info"))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
