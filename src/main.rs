use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trafoscript::cli::{self, Args};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trafoscript=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::execute(args)
}
