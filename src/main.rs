use std::sync::Arc;

use hangulcardbot::{
    commands::Command,
    config::Config,
    error::StartupError,
    keepalive,
    schema::schema,
    store::InMemSessionStore,
    vocab::Vocabulary,
};
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use teloxide::utils::command::BotCommands;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level)?;
    tracing::info!("Loaded configuration: {:?}", config);

    let vocab = Vocabulary::load(&config.words_path)?;
    vocab.ensure_quizzable()?;

    let keep_alive_addr = config.keep_alive_addr;
    tokio::spawn(async move {
        if let Err(e) = keepalive::serve(keep_alive_addr).await {
            tracing::error!("Keep-alive server stopped: {}", e);
        }
    });

    let bot = Bot::new(config.bot_token.clone());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }
    tracing::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![
            Arc::new(InMemSessionStore::new()),
            Arc::new(vocab)
        ])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}

fn init_tracing(level: &str) -> Result<(), StartupError> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    LogTracer::init()?;
    Ok(())
}
