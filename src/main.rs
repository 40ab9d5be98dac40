use chrono::Utc;

mod app;
mod config;
mod db;
mod error;
mod feed;
mod logging;
mod models;
mod pipeline;
mod services;

use app::App;
use config::Config;
use error::Result;
use services::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let dry_run = args.iter().skip(1).any(|a| a == "--dry-run");

    let config = Config::load()?;

    // Initialize logging (stderr plus the run log file)
    logging::init(&config.log_path)?;

    // Missing credentials abort here, before any feed is touched
    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        return Err(e);
    }

    let notifier = TelegramClient::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
        config.request_timeout(),
    )?;

    let now = Utc::now();
    let app = App::new(config, notifier, now).await?;

    // Print the digest instead of sending it
    if dry_run {
        let digest = app.preview(now).await?;
        if digest.is_empty() {
            println!("No new crypto news");
        } else {
            println!("{}", digest.text);
        }
        return Ok(());
    }

    tracing::info!("Crypto news run started");
    let report = app.run_once(now).await?;
    if !report.delivered && report.articles_selected > 0 {
        tracing::warn!(
            "Run finished without delivering {} selected articles",
            report.articles_selected
        );
    }

    Ok(())
}
