use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;

use pivotwatch::adapter::{telegram, BrsApiSource, JsonStore, TelegramMessenger};
use pivotwatch::app::Orchestrator;
use pivotwatch::config::Config;

#[derive(Parser)]
#[command(name = "pivotwatch", about = "Gold price pivot monitor and alert bot")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();
    info!("pivotwatch starting");

    let source = match BrsApiSource::new(config.feed.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Failed to build feed client: {e}");
            std::process::exit(1);
        }
    };
    let messenger = Arc::new(TelegramMessenger::new(&config.bot_token));
    let store = Arc::new(JsonStore::new(config.store.data_dir.clone()));

    let orchestrator = Arc::new(Orchestrator::new(
        source,
        messenger,
        store,
        config.monitor.detector.clone(),
    ));
    orchestrator.restore().await;

    tokio::select! {
        () = orchestrator.clone().run(config.interval()) => {}
        () = telegram::command_worker(&config.bot_token, orchestrator) => {}
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("pivotwatch stopped");
}
