use anyhow::Context;
use clap::Parser;
use sluice_kernel::WorkerConfig;
use sluice_kernel::config::load_config;
use sluice_logger::Logger;
use sluice_worker::{InvocationContext, Worker, demo};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncReadExt;

/// Feeds one change batch to the demo `users` router.
#[derive(Debug, Parser)]
#[command(name = "sluice-worker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Routes a change-stream batch to its table handlers")]
struct Cli {
    /// Configuration file; defaults to an optional `sluice.*` in the working directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Batch JSON (`{"Records": [...]}`); read from stdin when omitted
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// Request id reported in logs; generated when omitted
    #[arg(long)]
    request_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg: WorkerConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(cfg.name.clone(), &cfg.log)?.init()?;

    let payload = match &cli.batch {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read batch from {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await.context("Failed to read batch from stdin")?;
            buf
        },
    };

    let request_id = cli.request_id.unwrap_or_else(generated_request_id);
    let ctx = InvocationContext::for_worker(&cfg, request_id);

    let worker = Worker::new(demo::router()?);
    worker.invoke_json(&payload, &ctx).await?;
    Ok(())
}

fn generated_request_id() -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |since| since.as_nanos());
    format!("{}-{nanos:x}", std::process::id())
}
