//! Keyboards and button labels.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};
use url::Url;

pub(crate) const ADD_EXPENSE_BUTTON: &str = "➕ Add Expense";
pub(crate) const CATEGORIES_BUTTON: &str = "📊 Categories";
pub(crate) const SPREADSHEET_BUTTON: &str = "📝 Open Spreadsheet";
pub(crate) const HELP_BUTTON: &str = "ℹ️ Help";

/// The persistent reply keyboard shown under the text box.
pub(crate) fn main_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(ADD_EXPENSE_BUTTON),
            KeyboardButton::new(CATEGORIES_BUTTON),
        ],
        vec![
            KeyboardButton::new(SPREADSHEET_BUTTON),
            KeyboardButton::new(HELP_BUTTON),
        ],
    ])
    .resize_keyboard()
}

/// Inline keyboard with one button per category, two per row.
pub(crate) fn category_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for pair in categories.chunks(2) {
        rows.push(
            pair.iter()
                .map(|name| InlineKeyboardButton::callback(name.clone(), format!("cat:{name}")))
                .collect(),
        );
    }
    InlineKeyboardMarkup::new(rows)
}

/// Escape keys shown while waiting for the amount text.
pub(crate) fn entry_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🔄 Change Category",
            "expense:change",
        )],
        vec![InlineKeyboardButton::callback("❌ Cancel", "expense:cancel")],
    ])
}

/// Single URL button opening the current month's tab.
pub(crate) fn month_link_keyboard(url: &str) -> Option<InlineKeyboardMarkup> {
    let url = Url::parse(url).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("Open Current Month", url),
    ]]))
}
