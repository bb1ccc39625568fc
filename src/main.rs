use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::mpsc;

use relaybot::cli::{Cli, Commands};
use relaybot::core::config::{self, RelaySettings};
use relaybot::core::format::format_size;
use relaybot::core::health_server::start_health_server;
use relaybot::core::{init_logger, log_startup_configuration};
use relaybot::download::progress::{render_progress, ThrottledReporter};
use relaybot::download::DownloadOrchestrator;
use relaybot::telegram::{create_bot, schema, setup_bot_commands, BotService, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, storage directory, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config static is read
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Fetch { url, output }) => run_fetch(url, output).await,
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Starts the liveness server and the Telegram dispatcher.
async fn run_bot() -> Result<()> {
    log::info!("Starting relaybot...");

    let settings = RelaySettings::from_env();
    log_startup_configuration(&settings).await;

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let service = Arc::new(BotService::new(&settings)?);
    let deps = HandlerDeps::new(service);

    let health_port = *config::HEALTH_PORT;
    tokio::spawn(async move {
        if let Err(e) = start_health_server(health_port).await {
            log::error!("Health server stopped: {}", e);
        }
    });

    use teloxide::update_listeners::Polling;

    // Create polling listener that drops pending updates on start
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("🤖 Bot is running");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Downloads one URL through the orchestrator and leaves the file in place.
async fn run_fetch(url: String, output: Option<String>) -> Result<()> {
    let mut settings = RelaySettings::from_env();
    if let Some(dir) = output {
        settings = settings.with_storage_dir(PathBuf::from(dir));
    }
    let orchestrator = DownloadOrchestrator::new(&settings)?;

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let mut reporter = ThrottledReporter::default();

    let download = orchestrator.download(&url, progress_tx);
    let report = async {
        while let Some(sample) = progress_rx.recv().await {
            if reporter.maybe_emit(&sample) {
                println!("{}\n", render_progress(&sample, reporter.elapsed()));
            }
        }
    };
    let (result, ()) = tokio::join!(download, report);

    match result {
        Ok(result) => {
            let size = fs_err::metadata(&result.file_path)?.len();
            println!("✅ {} ({})", result.file_path.display(), format_size(size));
            Ok(())
        }
        Err(e) => {
            log::error!("❌ Fetch failed ({}): {}", e.subcategory(), e);
            Err(e.into())
        }
    }
}
