use std::sync::Arc;

use yoroolbot::keyboard::{CallbackDataStorage, CallbackDataStorageTrait};

use crate::storages::{
    ChannelStorage, ConversationStorage, ConversationStorageTrait, DocumentStoreTrait,
    MemoryDocumentStore, PostStorage, SettingsStorage, UserRegistry,
};

/// Main storage structure that holds all bot data
#[derive(Clone)]
pub struct Storage {
    documents: Arc<dyn DocumentStoreTrait>,
    conversations: Arc<dyn ConversationStorageTrait>,
    callback_data: Arc<dyn CallbackDataStorageTrait>,
}

impl Storage {
    /// Create a new storage with everything in memory
    pub fn new() -> Self {
        Self {
            documents: Arc::new(MemoryDocumentStore::new()),
            conversations: Arc::new(ConversationStorage::new()),
            callback_data: Arc::new(CallbackDataStorage::new()),
        }
    }

    /// Builder-like method to configure where the JSON documents live
    pub fn document_store(mut self, store: impl DocumentStoreTrait + 'static) -> Self {
        self.documents = Arc::new(store);
        self
    }

    pub fn users(&self, admin_id: Option<u64>) -> UserRegistry {
        UserRegistry::new(self.documents.clone(), admin_id)
    }

    pub fn channels(&self) -> ChannelStorage {
        ChannelStorage::new(self.documents.clone())
    }

    pub fn posts(&self) -> PostStorage {
        PostStorage::new(self.documents.clone())
    }

    pub fn settings(&self) -> SettingsStorage {
        SettingsStorage::new(self.documents.clone())
    }

    pub fn conversations(&self) -> Arc<dyn ConversationStorageTrait> {
        self.conversations.clone()
    }

    pub fn callback_data(&self) -> Arc<dyn CallbackDataStorageTrait> {
        self.callback_data.clone()
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
