use ledger::entry;
use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, MessageId, ParseMode},
};

use crate::{
    ConfigParameters,
    state::{Dialogue, Effect, Event, transition},
    ui,
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };

    // Commands work even mid-dialogue; unknown ones are dropped silently.
    if text.trim_start().starts_with('/') {
        if let Some(cmd) = parse_command(text) {
            handle_command(&bot, chat_id, &cfg, cmd).await?;
        }
        return Ok(());
    }

    // While an entry is pending, any free text is the amount/description,
    // including text that happens to match a keyboard button.
    let state = cfg.sessions.get(chat_id).await;
    if matches!(state, Dialogue::EnteringAmount { .. }) {
        let (next, effect) = transition(state, Event::EntryText(text));
        cfg.sessions.set(chat_id, next).await;
        match effect {
            Effect::RePrompt => {
                bot.send_message(chat_id, entry_reprompt_text()).await?;
            }
            Effect::Submit { category, entry } => {
                submit_entry(&bot, chat_id, &cfg, &category, &entry).await?;
            }
            _ => {}
        }
        return Ok(());
    }

    match text {
        ui::ADD_EXPENSE_BUTTON => start_expense(&bot, chat_id, &cfg).await?,
        ui::CATEGORIES_BUTTON => show_categories(&bot, chat_id, &cfg).await?,
        ui::SPREADSHEET_BUTTON => show_spreadsheet(&bot, chat_id, &cfg).await?,
        ui::HELP_BUTTON => send_help(&bot, chat_id).await?,
        _ => {
            bot.send_message(
                chat_id,
                "I don't understand that command. Please use the keyboard or type / to see available commands.",
            )
            .reply_markup(ui::main_keyboard())
            .await?;
        }
    }

    Ok(())
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    if data == "add_expense" {
        start_expense(&bot, chat_id, &cfg).await?;
        return Ok(());
    }

    let state = cfg.sessions.get(chat_id).await;
    if let Some(name) = data.strip_prefix("cat:") {
        let (next, effect) = transition(state, Event::PickCategory(name));
        cfg.sessions.set(chat_id, next).await;
        if let Effect::PromptEntry { category } = effect {
            bot.edit_message_text(chat_id, message_id, entry_prompt_text(&category))
                .parse_mode(ParseMode::Markdown)
                .reply_markup(ui::entry_keyboard())
                .await?;
        }
    } else if data == "expense:change" {
        let (next, effect) = transition(state, Event::ChangeCategory);
        cfg.sessions.set(chat_id, next).await;
        if effect == Effect::PromptCategory {
            prompt_category_edit(&bot, chat_id, message_id, &cfg).await?;
        }
    } else if data == "expense:cancel" {
        let (next, effect) = transition(state, Event::Cancel);
        cfg.sessions.set(chat_id, next).await;
        if effect == Effect::Cancelled {
            bot.edit_message_text(
                chat_id,
                message_id,
                "❌ Expense entry cancelled.\n\nWhat would you like to do next?",
            )
            .await?;
            bot.send_message(chat_id, "Use the keyboard below for quick access:")
                .reply_markup(ui::main_keyboard())
                .await?;
        }
    }

    Ok(())
}

/// Entry point of the add-expense dialogue: command, keyboard button and
/// inline callback all land here.
async fn start_expense(bot: &Bot, chat_id: ChatId, cfg: &ConfigParameters) -> ResponseResult<()> {
    let categories = match cfg.ledger.categories().await {
        Ok(categories) => categories,
        Err(err) => {
            tracing::error!("failed to resolve categories: {err}");
            bot.send_message(chat_id, resolver_failed_text())
                .reply_markup(ui::main_keyboard())
                .await?;
            return Ok(());
        }
    };

    if categories.is_empty() {
        cfg.sessions.set(chat_id, Dialogue::Idle).await;
        bot.send_message(chat_id, no_categories_text())
            .reply_markup(ui::main_keyboard())
            .await?;
        return Ok(());
    }

    let state = cfg.sessions.get(chat_id).await;
    let (next, effect) = transition(state, Event::StartExpense);
    cfg.sessions.set(chat_id, next).await;
    if effect == Effect::PromptCategory {
        bot.send_message(chat_id, "Please select the expense category:")
            .reply_markup(ui::category_keyboard(&categories))
            .await?;
    }
    Ok(())
}

/// "Change category" re-renders the selection in place of the prompt.
async fn prompt_category_edit(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    cfg: &ConfigParameters,
) -> ResponseResult<()> {
    let categories = match cfg.ledger.categories().await {
        Ok(categories) => categories,
        Err(err) => {
            tracing::error!("failed to resolve categories: {err}");
            bot.send_message(chat_id, resolver_failed_text()).await?;
            return Ok(());
        }
    };
    bot.edit_message_text(chat_id, message_id, "Please select the expense category:")
        .reply_markup(ui::category_keyboard(&categories))
        .await?;
    Ok(())
}

async fn submit_entry(
    bot: &Bot,
    chat_id: ChatId,
    cfg: &ConfigParameters,
    category: &str,
    text: &str,
) -> ResponseResult<()> {
    let Some((amount, description)) = entry::split_entry(text) else {
        // Transition already filters blank text; keep the state intact
        // for anything that still fails to split.
        cfg.sessions
            .set(
                chat_id,
                Dialogue::EnteringAmount {
                    category: category.to_string(),
                },
            )
            .await;
        bot.send_message(chat_id, entry_reprompt_text()).await?;
        return Ok(());
    };

    let amount = entry::normalize_amount(amount);
    let entry_text = format!("{amount} {description}");
    let entry_text = entry_text.trim();

    match cfg.ledger.add_expense(category, entry_text).await {
        Ok(written) => {
            tracing::debug!("expense stored at row {}", written.row);
            bot.send_message(
                chat_id,
                format!(
                    "✅ Expense added successfully!\n\nCategory: {category}\nEntry: {entry_text}\n\nUse the keyboard below to continue."
                ),
            )
            .reply_markup(ui::main_keyboard())
            .await?;
        }
        Err(err) => {
            tracing::error!("failed to add expense: {err}");
            bot.send_message(
                chat_id,
                format!("❌ Error saving expense: {err}\nPlease try again."),
            )
            .reply_markup(ui::main_keyboard())
            .await?;
        }
    }
    Ok(())
}

async fn show_categories(bot: &Bot, chat_id: ChatId, cfg: &ConfigParameters) -> ResponseResult<()> {
    let categories = match cfg.ledger.categories().await {
        Ok(categories) => categories,
        Err(err) => {
            tracing::error!("failed to resolve categories: {err}");
            bot.send_message(chat_id, resolver_failed_text())
                .reply_markup(ui::main_keyboard())
                .await?;
            return Ok(());
        }
    };

    if categories.is_empty() {
        bot.send_message(chat_id, no_categories_text())
            .reply_markup(ui::main_keyboard())
            .await?;
        return Ok(());
    }

    let listing: String = categories
        .iter()
        .map(|name| format!("• {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    bot.send_message(
        chat_id,
        format!("Available expense categories:\n\n{listing}"),
    )
    .reply_markup(ui::main_keyboard())
    .await?;
    Ok(())
}

async fn show_spreadsheet(
    bot: &Bot,
    chat_id: ChatId,
    cfg: &ConfigParameters,
) -> ResponseResult<()> {
    let link = match cfg.ledger.month_link().await {
        Ok(link) => link,
        Err(err) => {
            tracing::error!("failed to resolve month worksheet: {err}");
            bot.send_message(chat_id, resolver_failed_text())
                .reply_markup(ui::main_keyboard())
                .await?;
            return Ok(());
        }
    };

    let text = format!(
        "📝 *Your Expense Spreadsheet - {}*\n\nClick the button below to open your current month's expense sheet:",
        link.month
    );
    let message = bot.send_message(chat_id, text).parse_mode(ParseMode::Markdown);
    match ui::month_link_keyboard(&link.url) {
        Some(kb) => message.reply_markup(kb).await?,
        None => message.await?,
    };
    Ok(())
}

async fn send_help(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, help_text())
        .parse_mode(ParseMode::Markdown)
        .reply_markup(ui::main_keyboard())
        .await?;
    Ok(())
}

async fn handle_command(
    bot: &Bot,
    chat_id: ChatId,
    cfg: &ConfigParameters,
    cmd: Command,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            // Warm the category index so the first /expense is instant.
            if let Err(err) = cfg.ledger.categories().await {
                tracing::warn!("category warm-up failed: {err}");
            }
            bot.send_message(chat_id, welcome_text())
                .reply_markup(ui::main_keyboard())
                .await?;
        }
        Command::Help => send_help(bot, chat_id).await?,
        Command::Expense => start_expense(bot, chat_id, cfg).await?,
        Command::Categories => show_categories(bot, chat_id, cfg).await?,
        Command::Spreadsheet => show_spreadsheet(bot, chat_id, cfg).await?,
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Start,
    Help,
    Expense,
    Categories,
    Spreadsheet,
}

fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    // "/expense@my_bot" is the group-chat form.
    let name = first.split('@').next()?;
    match name {
        "/start" => Some(Command::Start),
        "/help" => Some(Command::Help),
        "/expense" => Some(Command::Expense),
        "/categories" => Some(Command::Categories),
        "/spreadsheet" => Some(Command::Spreadsheet),
        _ => None,
    }
}

fn welcome_text() -> &'static str {
    "Welcome to the Expense Tracker Bot!\n\nUse the keyboard below for quick access to commands or type:\n/expense - Add a new expense\n/categories - See available categories\n/spreadsheet - Open your expense spreadsheet\n/help - Get help with using the bot"
}

fn help_text() -> &'static str {
    "🤖 *Expense Tracker Help*\n\n*Available Commands:*\n/expense - Add a new expense\n/categories - View available expense categories\n/spreadsheet - Open your expense spreadsheet\n/help - Show this help message\n\n*How to Add an Expense:*\n1. Press 'Add Expense' or use /expense\n2. Select a category\n3. Enter amount and description\n\n*Example:* 25.50 Groceries at Walmart"
}

fn entry_prompt_text(category: &str) -> String {
    format!(
        "✅ Category selected: *{category}*\n\nPlease enter the amount and description in one message.\nFormat: [amount] [description]\nExample: 25.10 street food with family\n\nOr use the buttons below:"
    )
}

fn entry_reprompt_text() -> &'static str {
    "Please enter a valid amount and description.\nFormat: [amount] [description]\nExample: 25.10 street food with family"
}

fn no_categories_text() -> &'static str {
    "❌ No categories found in your spreadsheet. Please add category headers in row 1."
}

fn resolver_failed_text() -> &'static str {
    "❌ Could not reach the spreadsheet. Please try again later."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command("/expense"), Some(Command::Expense));
        assert_eq!(parse_command("  /help  "), Some(Command::Help));
        assert_eq!(parse_command("/start payload"), Some(Command::Start));
    }

    #[test]
    fn group_chat_suffix_is_stripped() {
        assert_eq!(
            parse_command("/categories@expense_bot"),
            Some(Command::Categories)
        );
    }

    #[test]
    fn unknown_commands_do_not_parse() {
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command("hello"), None);
    }
}
