use anyhow::{Context, Result};
use neutron_server::{EngineService, ServiceConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给响应）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("neutron_server=debug".parse()?))
        .init();

    info!("中子棋引擎服务启动中...");

    let config = ServiceConfig::load().context("加载配置失败")?;
    let service = EngineService::new(config.clone());

    if let Some(path) = config.model_path {
        if let Err(e) = service.load_model(path.clone()).await {
            warn!("启动时加载模型失败 {:?}: {}", path, e);
        }
    }

    // 每行一个 JSON 请求，每行一个 JSON 响应
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("读取标准输入失败")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = service.handle_line(line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("标准输入已关闭，服务退出");
    Ok(())
}
