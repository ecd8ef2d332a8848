use anyhow::Result;
use clap::Parser;
use tracing::info;

use deck_clock::config::{self, HostConfig};
use deck_clock::core::host::ClockHost;

#[derive(Parser, Debug)]
#[command(name = "deck-clock", about = "Seven-segment / analog clock face renderer")]
struct Args {
    /// Clock variant: digital, analog
    #[arg(long, default_value = "digital")]
    variant: config::ClockVariant,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 144)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 144)]
    height: u32,

    /// Milliseconds between redraws
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Output mode: png, datauri, none
    #[arg(long, default_value = "png")]
    output: config::OutputMode,

    /// Output file path (for png mode)
    #[arg(long, default_value = "clock.png")]
    output_path: String,

    /// Palette overrides as JSON, e.g. '{"lineOn":"#00FF00"}'
    #[arg(long)]
    colors: Option<String>,

    /// Stop after this many frames (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    info!(
        "deck-clock v{} starting ({:?}, {}x{})",
        env!("CARGO_PKG_VERSION"),
        args.variant,
        args.width,
        args.height
    );

    let mut host = ClockHost::new(HostConfig {
        width: args.width,
        height: args.height,
        variant: args.variant,
        interval_ms: args.interval_ms,
        output_mode: args.output,
        output_path: args.output_path.into(),
        colors: args.colors,
        frames: args.frames,
    })?;

    host.run().await?;

    info!("deck-clock shutdown");
    Ok(())
}
