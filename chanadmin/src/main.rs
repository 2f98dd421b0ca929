mod commands;
mod config;
mod conversation;
mod dispatcher;
mod handlers;
mod menus;
mod storages;
mod utils;

use std::sync::Arc;

use clap::Parser;
use commands::Command;
use config::Args;
use conversation::ConversationMachine;
use dispatcher::{BotPublisher, PostPublisher, run_dispatcher};
use handlers::{handle_callback_query, handle_message};
use storages::{JsonFileStore, Storage};
use teloxide::{prelude::*, utils::command::BotCommands};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "chanadmin=info".to_string()))
        .init();
    log::info!("Starting channel admin bot...");

    let config = match args.into_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    log::info!("Using data directory: {:?}", config.data_dir);
    let storage = Storage::new().document_store(JsonFileStore::new(&config.data_dir));

    let bot = Bot::new(config.bot_token.clone());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let publisher: Arc<dyn PostPublisher> =
        Arc::new(BotPublisher::new(bot.clone(), storage.callback_data()));
    tokio::spawn(run_dispatcher(
        publisher,
        storage.clone(),
        config.dispatch_interval,
    ));

    let machine = Arc::new(ConversationMachine::new(storage, config));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![machine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
