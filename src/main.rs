//! Blog Manager - command-line blog post manager

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_manager::{
    cli::{self, Cli},
    config::Config,
    services::PostStore,
};

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "blog_manager=debug"
    } else {
        "blog_manager=warn"
    };

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_with_env(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database.override_url(url);
    }
    tracing::debug!(
        driver = %config.database.driver,
        url = %config.database.redacted_url(),
        "Configuration loaded"
    );

    let store = PostStore::connect(&config.database).await?;

    let command = cli.subcommand_or_menu();
    let result = cli::execute(&store, command, cli.json, &mut io::stdout()).await;

    store.close().await;
    result
}
