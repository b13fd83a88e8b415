use anyhow::Context;
use asset_sync::output::{process_line, read_lines};
use asset_sync::{AssetSync, SyncConfig};
use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SyncConfig::load().context("loading asset-sync configuration")?;
    init_tracing(&config);

    let store = config
        .store
        .build()
        .await
        .context("building reference store")?;
    let sync = AssetSync::new(store);
    info!(concurrency = config.concurrency, "asset sync ready");

    let lines = read_lines(BufReader::new(tokio::io::stdin()));

    let sync = &sync;
    let mut outputs = Box::pin(
        lines
            .map(|line| async move {
                match line {
                    Ok(line) => Ok(process_line(sync, &line).await),
                    Err(err) => Err(err),
                }
            })
            .buffered(config.concurrency),
    );

    let mut stdout = tokio::io::stdout();
    while let Some(output) = outputs.next().await {
        let Some(output) = output.context("reading change events from stdin")? else {
            continue;
        };
        stdout.write_all(output.to_json().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

fn init_tracing(config: &SyncConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
