//! FoodChat CLI entry point.

use clap::Parser;
use foodchat_cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so key output on stdout stays clean
    let default_filter = match cli.verbose {
        0 => "foodchat=info",
        1 => "foodchat=debug",
        _ => "foodchat=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli).await
}
