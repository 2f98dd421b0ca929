use std::{collections::HashMap, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::conversation::{Session, State};

/// Trait for per-chat conversation sessions. A chat without a session is in the ended state.
#[async_trait::async_trait]
pub trait ConversationStorageTrait: Send + Sync {
    async fn get_session(&self, chat_id: ChatId) -> Option<Session>;

    async fn set_session(&self, chat_id: ChatId, session: Session);

    /// End the conversation, returning the session it had
    async fn remove_session(&self, chat_id: ChatId) -> Option<Session>;

    async fn get_state(&self, chat_id: ChatId) -> Option<State> {
        self.get_session(chat_id).await.map(|session| session.state)
    }
}

type ConversationStorageData = Arc<Mutex<HashMap<ChatId, Session>>>;

/// In-memory sessions, lost on restart
#[derive(Clone)]
pub struct ConversationStorage {
    data: ConversationStorageData,
}

impl ConversationStorage {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for ConversationStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConversationStorageTrait for ConversationStorage {
    async fn get_session(&self, chat_id: ChatId) -> Option<Session> {
        let storage_guard = self.data.lock().await;
        storage_guard.get(&chat_id).cloned()
    }

    async fn set_session(&self, chat_id: ChatId, session: Session) {
        let mut storage_guard = self.data.lock().await;
        storage_guard.insert(chat_id, session);
    }

    async fn remove_session(&self, chat_id: ChatId) -> Option<Session> {
        let mut storage_guard = self.data.lock().await;
        storage_guard.remove(&chat_id)
    }
}
