use std::sync::Arc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::{
    document_store::{Document, DocumentStoreTrait, Domain},
    post_storage::PostButton,
};

const KNOWN_KEYS: [&str; 5] = [
    "welcome_message",
    "signature",
    "silent_posts",
    "favorite_buttons",
    "favorite_channels",
];

/// Bot-wide settings stored in settings.json.
///
/// Keys this bot doesn't know about are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default)]
    pub silent_posts: bool,
    #[serde(default)]
    pub favorite_buttons: Vec<PostButton>,
    #[serde(default)]
    pub favorite_channels: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Append the signature (if any) to a post text
    pub fn sign(&self, text: &str) -> String {
        match self.signature.as_deref() {
            Some(signature) if !signature.is_empty() => format!("{}\n\n{}", text, signature),
            _ => text.to_string(),
        }
    }

    pub fn is_favorite_channel(&self, channel_id: &str) -> bool {
        self.favorite_channels.iter().any(|id| id == channel_id)
    }

    /// Add the channel to favorites or remove it from there; returns the new state
    pub fn toggle_favorite_channel(&mut self, channel_id: &str) -> bool {
        if self.is_favorite_channel(channel_id) {
            self.favorite_channels.retain(|id| id != channel_id);
            false
        } else {
            self.favorite_channels.push(channel_id.to_string());
            true
        }
    }
}

/// Decode one known key; a missing or malformed value falls back to the default
fn decode_key<T: DeserializeOwned + Default>(document: &Document, key: &str) -> T {
    match document.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("Malformed {:?} in {}: {}", key, Domain::Settings, e);
            T::default()
        }),
    }
}

fn decode_settings(document: &Document) -> Settings {
    let mut extra = document.clone();
    for key in KNOWN_KEYS {
        extra.remove(key);
    }
    Settings {
        welcome_message: decode_key(document, "welcome_message"),
        signature: decode_key(document, "signature"),
        silent_posts: decode_key(document, "silent_posts"),
        favorite_buttons: decode_key(document, "favorite_buttons"),
        favorite_channels: decode_key(document, "favorite_channels"),
        extra,
    }
}

fn encode_settings(settings: &Settings) -> Option<Document> {
    match serde_json::to_value(settings) {
        Ok(Value::Object(document)) => Some(document),
        Ok(_) => None,
        Err(e) => {
            log::error!("Failed to encode {}: {}", Domain::Settings, e);
            None
        }
    }
}

#[derive(Clone)]
pub struct SettingsStorage {
    documents: Arc<dyn DocumentStoreTrait>,
}

impl SettingsStorage {
    pub fn new(documents: Arc<dyn DocumentStoreTrait>) -> Self {
        Self { documents }
    }

    pub async fn get_settings(&self) -> Settings {
        decode_settings(&self.documents.load(Domain::Settings).await)
    }

    /// Read-modify-write helper. Only keys whose value the update changed are written back;
    /// everything else in the stored document, malformed values included, stays as it was.
    pub async fn update_settings(&self, update: impl FnOnce(&mut Settings)) -> Settings {
        let mut document = self.documents.load(Domain::Settings).await;
        let before = decode_settings(&document);
        let mut settings = before.clone();
        update(&mut settings);

        let (Some(old), Some(new)) = (encode_settings(&before), encode_settings(&settings)) else {
            return settings;
        };
        if old == new {
            return settings;
        }
        for key in old.keys().filter(|key| !new.contains_key(*key)) {
            document.remove(key);
        }
        for (key, value) in new {
            if old.get(&key) != Some(&value) {
                document.insert(key, value);
            }
        }
        self.documents.save(Domain::Settings, &document).await;
        settings
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storages::document_store::MemoryDocumentStore;

    #[tokio::test]
    async fn test_unknown_keys_survive_updates() {
        let documents: Arc<dyn DocumentStoreTrait> = Arc::new(MemoryDocumentStore::new());
        let Value::Object(initial) = json!({"theme": "dark", "signature": "Bye"}) else {
            unreachable!()
        };
        documents.save(Domain::Settings, &initial).await;

        let storage = SettingsStorage::new(documents.clone());
        let settings = storage
            .update_settings(|settings| settings.welcome_message = Some("Hi".to_string()))
            .await;
        assert_eq!(settings.signature.as_deref(), Some("Bye"));

        let stored = documents.load(Domain::Settings).await;
        assert_eq!(stored["theme"], json!("dark"));
        assert_eq!(stored["welcome_message"], json!("Hi"));
        assert_eq!(stored["signature"], json!("Bye"));
    }

    #[tokio::test]
    async fn test_empty_document_gives_defaults() {
        let storage = SettingsStorage::new(Arc::new(MemoryDocumentStore::new()));
        assert_eq!(storage.get_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_malformed_key_falls_back_alone() {
        let documents: Arc<dyn DocumentStoreTrait> = Arc::new(MemoryDocumentStore::new());
        let Value::Object(initial) = json!({"silent_posts": "yes please", "signature": "@team"})
        else {
            unreachable!()
        };
        documents.save(Domain::Settings, &initial).await;
        let storage = SettingsStorage::new(documents);
        let settings = storage.get_settings().await;
        assert!(!settings.silent_posts);
        assert_eq!(settings.signature.as_deref(), Some("@team"));
        assert!(settings.extra.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_other_keys_next_to_malformed_one() {
        let documents: Arc<dyn DocumentStoreTrait> = Arc::new(MemoryDocumentStore::new());
        let Value::Object(initial) = json!({
            "silent_posts": "yes",
            "welcome_message": "Hi all",
            "signature": "@team",
            "favorite_channels": 17,
            "theme": "dark"
        }) else {
            unreachable!()
        };
        documents.save(Domain::Settings, &initial).await;
        let storage = SettingsStorage::new(documents.clone());

        let settings = storage
            .update_settings(|settings| settings.silent_posts = true)
            .await;
        assert_eq!(settings.welcome_message.as_deref(), Some("Hi all"));

        let stored = documents.load(Domain::Settings).await;
        assert_eq!(
            stored,
            json!({
                "silent_posts": true,
                "welcome_message": "Hi all",
                "signature": "@team",
                "favorite_channels": 17,
                "theme": "dark"
            })
            .as_object()
            .unwrap()
            .clone()
        );
    }

    #[tokio::test]
    async fn test_clearing_a_key_removes_it() {
        let documents: Arc<dyn DocumentStoreTrait> = Arc::new(MemoryDocumentStore::new());
        let storage = SettingsStorage::new(documents.clone());
        storage
            .update_settings(|settings| settings.signature = Some("@team".to_string()))
            .await;
        assert_eq!(documents.load(Domain::Settings).await["signature"], json!("@team"));

        storage.update_settings(|settings| settings.signature = None).await;
        assert!(!documents.load(Domain::Settings).await.contains_key("signature"));
    }

    #[test]
    fn test_sign_and_favorites() {
        let mut settings = Settings::default();
        assert_eq!(settings.sign("Hello"), "Hello");
        settings.signature = Some("@news_feed".to_string());
        assert_eq!(settings.sign("Hello"), "Hello\n\n@news_feed");

        assert!(settings.toggle_favorite_channel("@a_channel"));
        assert!(settings.is_favorite_channel("@a_channel"));
        assert!(!settings.toggle_favorite_channel("@a_channel"));
        assert!(settings.favorite_channels.is_empty());
    }
}
