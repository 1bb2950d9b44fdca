mod gateway;
mod menu;
mod sessions;

use clap::{Parser, Subcommand};
use spravy_channels::telegram::TelegramChannel;
use spravy_core::config;
use spravy_store::Store;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "spravy", version, about = "Spravy — особистий бот для списку справ")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and storage.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;

            let channel = Arc::new(TelegramChannel::new(cfg.telegram.clone()));
            let store = Store::new(&cfg.store).await?;

            println!("Spravy — starting bot...");
            let mut gw = gateway::Gateway::new(channel, store, cfg.reminders.clone());
            gw.run().await?;
        }
        Commands::Status => {
            println!("Spravy — Status Check\n");
            println!("Config: {}", cli.config);

            match config::load(&cli.config) {
                Ok(cfg) => {
                    println!("  telegram: configured");
                    println!("  database: {}", cfg.store.db_path);
                    println!(
                        "  reminder window: {} – {}",
                        cfg.reminders.window_start, cfg.reminders.window_end
                    );
                }
                Err(e) => println!("  config error: {e}"),
            }
        }
    }

    Ok(())
}
