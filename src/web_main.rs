//! Web 服务器主程序入口

use readoku::translation::ConfigManager;
use readoku::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    readoku::logging::init_tracing();

    let config = ConfigManager::new()?.into_config();
    let web_config = WebConfig::from_config(&config)?;

    let server = WebServer::new(web_config, config);
    server.start().await?;

    Ok(())
}
