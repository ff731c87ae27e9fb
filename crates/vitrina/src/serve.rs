// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vitrina serve` command implementation.
//!
//! Opens the SQLite store, wires the moderation engine, notifier, search
//! service and wizard session store onto the Telegram transport, and long
//! polls until interrupted.

use std::sync::Arc;

use tracing::info;
use vitrina_config::VitrinaConfig;
use vitrina_core::error::VitrinaError;
use vitrina_core::types::{ChatId, UserId};
use vitrina_core::{ListingStore, SearchBackend, Transport};
use vitrina_moderation::{ModerationEngine, ModerationNotifier, PublicationTarget};
use vitrina_search::{OpenAiBackend, SearchService};
use vitrina_storage::{Database, SqliteListingStore};
use vitrina_telegram::{Router, TelegramTransport};
use vitrina_wizard::SessionStore;

/// Runs the `vitrina serve` command.
pub async fn run_serve(config: VitrinaConfig) -> Result<(), VitrinaError> {
    init_tracing(&config.bot.log_level);

    info!("starting vitrina serve");

    let token = config
        .bot
        .token
        .as_deref()
        .ok_or_else(|| VitrinaError::Config("bot.token is required for serve".into()))?;

    let database =
        Database::open_with_options(&config.storage.database_path, config.storage.wal_mode)
            .await?;
    info!(
        path = config.storage.database_path.as_str(),
        wal_mode = config.storage.wal_mode,
        "database ready"
    );

    let store: Arc<dyn ListingStore> = Arc::new(SqliteListingStore::new(database));

    let moderators: Vec<UserId> = config
        .moderation
        .moderator_ids
        .iter()
        .copied()
        .map(UserId)
        .collect();
    info!(count = moderators.len(), "moderation team configured");

    let transport = Arc::new(TelegramTransport::new(token)?);
    let bot = transport.bot().clone();
    let transport: Arc<dyn Transport> = transport;

    let engine = Arc::new(ModerationEngine::new(
        store.clone(),
        moderators.clone(),
        config.moderation.min_comment_len,
    ));

    let publication = PublicationTarget {
        chat_id: config.publication.chat_id.map(ChatId),
        topic_id: config.publication.topic_id,
        chat_url: config.publication.chat_url.clone(),
    };
    if publication.chat_id.is_none() {
        info!("no publication channel configured; approvals stay private");
    }
    let notifier = Arc::new(ModerationNotifier::new(
        transport.clone(),
        moderators,
        publication,
    ));

    let backend: Option<Arc<dyn SearchBackend>> = match &config.search.openai_api_key {
        Some(key) => {
            info!(model = config.search.model.as_str(), "LLM search ranking enabled");
            Some(Arc::new(OpenAiBackend::new(
                key,
                config.search.model.clone(),
                config.search.max_results,
                config.search.min_relevance,
            )?))
        }
        None => {
            info!("no search API key configured; using substring fallback only");
            None
        }
    };
    let search = Arc::new(SearchService::new(backend, config.search.max_results));

    let router = Arc::new(Router::new(
        transport,
        Arc::new(SessionStore::new()),
        engine,
        notifier,
        search,
        store,
        config.publication.chat_url,
    ));

    vitrina_telegram::run_polling(bot, router).await;

    info!("vitrina serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vitrina={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
