use std::{
    collections::{HashMap, VecDeque},
    fmt::Display,
    str::FromStr,
    sync::Arc,
};

use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup};
use tokio::sync::Mutex;

use super::{ButtonData, MAX_CALLBACK_DATA_LEN};

/// How many long callback payloads are remembered per chat
const DEFAULT_CAPACITY_PER_CHAT: usize = 256;

/// Trait for callback data storage operations (maps short references to full callback data)
/// This is used to work around Telegram's 64-byte limit on callback data
#[async_trait::async_trait]
pub trait CallbackDataStorageTrait: Send + Sync {
    /// Store callback data for a chat and return a short reference string
    async fn store_callback_data(&self, chat_id: ChatId, data: String) -> String;

    /// Retrieve original callback data from a reference string
    async fn get_callback_data(&self, reference: &str) -> Option<String>;
}

/// The key for the callback data storage map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackDataKey {
    chat_id: ChatId,
    seq: u64,
}

/// Format used in the button callback data: "cb:{chat_id}:{seq}"
impl Display for CallbackDataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cb:{}:{}", self.chat_id.0, self.seq)
    }
}

impl FromStr for CallbackDataKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some("cb"), Some(chat_id), Some(seq), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(());
        };
        Ok(CallbackDataKey {
            chat_id: ChatId(chat_id.parse().map_err(|_| ())?),
            seq: seq.parse().map_err(|_| ())?,
        })
    }
}

#[derive(Default)]
struct ChatCallbacks {
    next_seq: u64,
    entries: VecDeque<(u64, String)>,
}

/// In-memory CallbackDataStorage. Keeps the most recent payloads of every chat and evicts the
/// oldest ones, so buttons of very old menus may stop resolving.
#[derive(Clone)]
pub struct CallbackDataStorage {
    data: Arc<Mutex<HashMap<ChatId, ChatCallbacks>>>,
    capacity: usize,
}

impl CallbackDataStorage {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_PER_CHAT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }
}

impl Default for CallbackDataStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CallbackDataStorageTrait for CallbackDataStorage {
    async fn store_callback_data(&self, chat_id: ChatId, data: String) -> String {
        let mut storage_guard = self.data.lock().await;
        let chat = storage_guard.entry(chat_id).or_default();

        // the same payload rendered again reuses its reference
        if let Some((seq, _)) = chat.entries.iter().find(|(_, stored)| *stored == data) {
            return CallbackDataKey { chat_id, seq: *seq }.to_string();
        }

        let seq = chat.next_seq;
        chat.next_seq += 1;
        chat.entries.push_back((seq, data));
        while chat.entries.len() > self.capacity {
            chat.entries.pop_front();
        }
        CallbackDataKey { chat_id, seq }.to_string()
    }

    async fn get_callback_data(&self, reference: &str) -> Option<String> {
        let key = CallbackDataKey::from_str(reference).ok()?;
        let storage_guard = self.data.lock().await;
        storage_guard
            .get(&key.chat_id)?
            .entries
            .iter()
            .find(|(seq, _)| *seq == key.seq)
            .map(|(_, data)| data.clone())
    }
}

/// Build an InlineKeyboardMarkup from button rows, replacing callback data that Telegram would
/// reject (longer than 64 bytes or non-ASCII) with short storage references.
pub async fn pack_keyboard<R, B>(
    storage: &Arc<dyn CallbackDataStorageTrait>,
    chat_id: ChatId,
    rows: impl IntoIterator<Item = R>,
) -> InlineKeyboardMarkup
where
    R: IntoIterator<Item = B>,
    B: Into<ButtonData>,
{
    let mut button_rows = Vec::new();
    for row in rows {
        let mut button_row = Vec::new();
        for item in row {
            match item.into() {
                ButtonData::Callback(label, callback_data) => {
                    let needs_storage =
                        callback_data.len() > MAX_CALLBACK_DATA_LEN || !callback_data.is_ascii();
                    let final_callback_data = if needs_storage {
                        storage.store_callback_data(chat_id, callback_data).await
                    } else {
                        callback_data
                    };
                    button_row.push(InlineKeyboardButton::callback(label, final_callback_data));
                }
                ButtonData::Url(label, url) => {
                    button_row.push(InlineKeyboardButton::url(label, url));
                }
            }
        }
        button_rows.push(button_row);
    }
    InlineKeyboardMarkup::new(button_rows)
}

/// Resolve callback data of a pressed button: storage references are replaced by the stored
/// payload, anything else (or an evicted reference) is returned as is.
pub async fn unpack_callback_data(
    storage: &Arc<dyn CallbackDataStorageTrait>,
    callback_data: &str,
) -> String {
    if callback_data.starts_with("cb:") {
        if let Some(original) = storage.get_callback_data(callback_data).await {
            return original;
        }
    }
    callback_data.to_string()
}
