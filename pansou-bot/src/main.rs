use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{info, warn};

use pansou_commands::{BotDeleter, Command, handle_callback, handle_command, handle_text};
use pansou_core::{Config, Context};
use pansou_nav::{DeletionQueue, SearchCache};
use pansou_search::PansouClient;
use pansou_settings::SettingsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env()?);
    let bot = Bot::new(&config.bot_token);

    let client = Arc::new(PansouClient::new(
        &config.pansou_api_url,
        config.pansou_api_token.clone(),
        config.search_timeout,
    )?);
    let settings = Arc::new(SettingsStore::new(&config.data_dir)?);
    let cache = Arc::new(SearchCache::new());
    let deletions = DeletionQueue::new(
        Arc::new(BotDeleter::new(bot.clone())),
        config.sweep_interval,
    );
    let ctx = Context::new(config, client, cache, deletions, settings);

    if ctx.client.health_check().await {
        info!(url = %ctx.config.pansou_api_url, "search service reachable");
    } else {
        warn!(url = %ctx.config.pansou_api_url, "search service unreachable at startup");
    }

    let command_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(|bot: Bot, ctx: Context, msg: Message, cmd: Command| async move {
            if let Err(source) = handle_command(bot, ctx, msg, cmd).await {
                warn!(%source, "command handler failed");
            }
            respond(())
        });

    let message_handler =
        Update::filter_message().endpoint(|bot: Bot, ctx: Context, msg: Message| async move {
            if let Err(source) = handle_text(bot, ctx, msg).await {
                warn!(%source, "message handler failed");
            }
            respond(())
        });

    let callback_handler = Update::filter_callback_query().endpoint(
        |bot: Bot, ctx: Context, query: CallbackQuery| async move {
            if let Err(source) = handle_callback(bot, ctx, query).await {
                warn!(%source, "callback handler failed");
            }
            respond(())
        },
    );

    let handler = dptree::entry()
        .branch(command_handler)
        .branch(message_handler)
        .branch(callback_handler);

    info!("pansou bot is connecting...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
