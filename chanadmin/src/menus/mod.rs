pub mod broadcast;
pub mod channels;
pub mod favorites;
pub mod main_menu;
pub mod posts;
pub mod settings;
pub mod users;
pub mod welcome;

use chrono::{DateTime, Utc};
use yoroolbot::{
    keyboard::{ButtonData, Keyboard},
    markdown::MarkdownString,
};

use crate::{
    config::Config,
    conversation::{CallbackToken, OutgoingMessage, Sender, State, Transition},
    storages::{ChannelStorage, PostStorage, SettingsStorage, Storage, UserRegistry},
};

/// Everything a menu handler may look at while handling one event
pub struct MenuContext<'a> {
    pub storage: &'a Storage,
    pub config: &'a Config,
    pub sender: &'a Sender,
    pub now: DateTime<Utc>,
}

impl MenuContext<'_> {
    pub fn users(&self) -> UserRegistry {
        self.storage.users(self.config.admin_id)
    }

    pub fn channels(&self) -> ChannelStorage {
        self.storage.channels()
    }

    pub fn posts(&self) -> PostStorage {
        self.storage.posts()
    }

    pub fn settings(&self) -> SettingsStorage {
        self.storage.settings()
    }
}

pub fn button(label: impl Into<String>, token: CallbackToken) -> ButtonData {
    ButtonData::callback(label, token)
}

pub fn back_row() -> Vec<ButtonData> {
    vec![button("↩️ Main Menu", CallbackToken::MainMenu)]
}

/// Menu message with a trailing "back to main menu" row
pub fn menu(text: MarkdownString, mut keyboard: Keyboard) -> OutgoingMessage {
    keyboard.push(back_row());
    OutgoingMessage::new(text).keyboard(keyboard)
}

/// Stay in `state` and tell the admin what went wrong
pub fn stay(state: State, text: MarkdownString) -> Transition {
    Transition::to(state).reply(OutgoingMessage::new(text))
}

/// Show `text` before whatever `then` renders
pub fn notice(text: MarkdownString, then: Transition) -> Transition {
    let mut transition = then;
    transition
        .replies
        .insert(0, OutgoingMessage::new(text).into());
    transition
}
