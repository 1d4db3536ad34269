//! Per-chat dialogue state.
//!
//! The add-expense conversation is an explicit state machine: a pure
//! [`transition`] function maps (state, event) to the next state plus
//! the side effect the handler should perform. Pairs with no matching
//! transition produce [`Effect::Ignore`], which is how stray input is
//! rejected.

use std::{collections::HashMap, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Dialogue {
    #[default]
    Idle,
    SelectingCategory,
    EnteringAmount {
        category: String,
    },
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Event<'a> {
    StartExpense,
    PickCategory(&'a str),
    ChangeCategory,
    Cancel,
    EntryText(&'a str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Show the category keyboard.
    PromptCategory,
    /// Ask for "amount description" for the chosen category.
    PromptEntry { category: String },
    /// Hand the entry text to the expense writer.
    Submit { category: String, entry: String },
    /// Malformed entry text, ask again without leaving the state.
    RePrompt,
    /// Dialogue cancelled, session cleared.
    Cancelled,
    /// No matching transition.
    Ignore,
}

pub(crate) fn transition(state: Dialogue, event: Event<'_>) -> (Dialogue, Effect) {
    match (state, event) {
        // Every entry point restarts the dialogue from category selection.
        (_, Event::StartExpense) => (Dialogue::SelectingCategory, Effect::PromptCategory),
        (Dialogue::SelectingCategory, Event::PickCategory(name)) => (
            Dialogue::EnteringAmount {
                category: name.to_string(),
            },
            Effect::PromptEntry {
                category: name.to_string(),
            },
        ),
        (Dialogue::EnteringAmount { .. }, Event::ChangeCategory) => {
            (Dialogue::SelectingCategory, Effect::PromptCategory)
        }
        (Dialogue::EnteringAmount { category }, Event::EntryText(text)) => {
            if text.trim().is_empty() {
                (Dialogue::EnteringAmount { category }, Effect::RePrompt)
            } else {
                (
                    Dialogue::Idle,
                    Effect::Submit {
                        category,
                        entry: text.to_string(),
                    },
                )
            }
        }
        (Dialogue::SelectingCategory | Dialogue::EnteringAmount { .. }, Event::Cancel) => {
            (Dialogue::Idle, Effect::Cancelled)
        }
        (state, _) => (state, Effect::Ignore),
    }
}

#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    inner: Arc<Mutex<HashMap<ChatId, Dialogue>>>,
}

impl SessionStore {
    pub(crate) async fn get(&self, chat_id: ChatId) -> Dialogue {
        let guard = self.inner.lock().await;
        guard.get(&chat_id).cloned().unwrap_or_default()
    }

    /// Stores the state; `Idle` removes the entry entirely.
    pub(crate) async fn set(&self, chat_id: ChatId, state: Dialogue) {
        let mut guard = self.inner.lock().await;
        if state == Dialogue::Idle {
            guard.remove(&chat_id);
        } else {
            guard.insert(chat_id, state);
        }
    }
}
