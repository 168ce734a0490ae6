//! Complimask - masking decision service
//!
//! Serves JSON-lines commands over stdin/stdout until EOF or Ctrl-C.

use anyhow::{Context, Result};
use complimask_api::utils::logging::init_tracing;
use complimask_api::{handle_line, AppContext};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before tracing so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "complimask starting...");
    let ctx = AppContext::new().context("failed to initialise masking service")?;
    info!(
        roles = ctx.service.engine().policy().roles().len(),
        "complimask initialized successfully"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                None
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle_line(&ctx, &line).await;
        let mut encoded = serde_json::to_vec(&reply).context("failed to encode reply")?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await.context("failed to write stdout")?;
        stdout.flush().await.context("failed to flush stdout")?;
    }

    ctx.shutdown();
    info!("complimask stopped");
    Ok(())
}
