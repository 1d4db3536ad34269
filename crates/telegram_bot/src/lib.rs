//! Telegram bot.
//!
//! The bot is a thin client: every spreadsheet operation goes through the
//! [`Ledger`], which owns the month worksheet resolution and the category
//! index.

use std::sync::Arc;

use ledger::Ledger;
use teloxide::{prelude::*, types::BotCommand};

mod handlers;
mod state;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    ledger: Arc<Ledger>,
    sessions: state::SessionStore,
}

pub struct Bot {
    token: String,
    ledger: Arc<Ledger>,
}

impl Bot {
    pub fn new(token: &str, ledger: Arc<Ledger>) -> Self {
        Self {
            token: token.to_string(),
            ledger,
        }
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        if let Err(err) = bot.set_my_commands(command_menu()).await {
            tracing::warn!("failed to register the command menu: {err}");
        }

        let parameters = ConfigParameters {
            ledger: self.ledger.clone(),
            sessions: state::SessionStore::default(),
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

fn command_menu() -> Vec<BotCommand> {
    vec![
        BotCommand::new("expense", "Add a new expense"),
        BotCommand::new("categories", "See available categories"),
        BotCommand::new("spreadsheet", "Open your expense spreadsheet"),
        BotCommand::new("help", "Get help with using the bot"),
    ]
}
