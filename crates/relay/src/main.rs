use std::path::PathBuf;

use clap::Parser;
use notifier::{LoggingSender, MessageSender, Notifier, NotifierConfig};
use relay::{InputFormat, Relay, RelayStats};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "slack-relay")]
#[command(about = "Forward log and alert events to a Slack incoming webhook")]
#[command(version)]
struct Args {
    /// Read events from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Input line format
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// Log payloads instead of posting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = NotifierConfig::from_env()?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "Reading events from file");
            Box::new(BufReader::new(tokio::fs::File::open(path).await?))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let stats = if args.dry_run {
        run(Notifier::from_config(&config, LoggingSender)?, args.format, reader).await?
    } else {
        run(Notifier::connect(&config)?, args.format, reader).await?
    };

    info!(
        received = stats.received,
        dispatched = stats.dispatched,
        suppressed = stats.suppressed,
        failed = stats.failed,
        skipped = stats.skipped,
        "Relay finished"
    );
    Ok(())
}

async fn run<S: MessageSender>(
    notifier: Notifier<S>,
    format: InputFormat,
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
) -> Result<RelayStats, relay::RelayError> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    Relay::new(notifier, format).run_with_shutdown(reader, shutdown).await
}
