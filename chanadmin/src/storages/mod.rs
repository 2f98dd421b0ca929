mod channel_storage;
mod conversation_storage;
mod document_store;
mod post_storage;
mod records;
mod settings_storage;
mod storage;
mod user_registry;

pub use channel_storage::{ChannelStorage, channel_recipient, parse_channel_id};
pub use conversation_storage::{ConversationStorage, ConversationStorageTrait};
pub use document_store::{DocumentStoreTrait, JsonFileStore, MemoryDocumentStore};
pub use post_storage::{PostButton, PostMedia, PostStorage, ScheduledPost};
pub use settings_storage::SettingsStorage;
pub use storage::Storage;
pub use user_registry::{User, UserRegistry};
