use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use threadroom::domain::{RoomDataPort, TopicId};
use threadroom::infrastructure::{
    AppConfig, CliArgs, RestRoomClient, StateConfig, StorageManager, SyntectEngine,
    SystemClipboard,
};
use threadroom::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(storage: &StorageManager) -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let storage = StorageManager::new()?;
    let config = load_config(&storage)?;

    init_logging(&config)?;

    info!(version = threadroom::VERSION, "Starting Threadroom");

    let state = storage.load_state().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load state, starting fresh");
        StateConfig::default()
    });

    let Some(topic) = config.topic.or(state.last_topic_id) else {
        bail!("no topic to join: pass --topic <id>");
    };

    let client = Arc::new(RestRoomClient::new(
        config.api_base_url.clone(),
        config.token.clone(),
    )?);
    let user = client.fetch_current_user().await?;
    info!(user = %user.username(), "Authenticated");

    let app = App::new(
        client,
        Arc::new(SyntectEngine::new()),
        Arc::new(SystemClipboard::new()),
        config.room.clone(),
        user,
    );

    let last_topic = app.run(TopicId(topic)).await?;

    if let Some(topic_id) = last_topic {
        if let Err(e) = storage.remember_topic(topic_id) {
            warn!(error = %e, "Failed to save state");
        }
    }

    Ok(())
}
