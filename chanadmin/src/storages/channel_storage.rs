use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use teloxide::types::{ChatId, Recipient};

use super::{
    document_store::{DocumentStoreTrait, Domain},
    records::{decode_record, decode_records, encode_record},
};

static CHANNEL_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z][A-Za-z0-9_]{3,31}$").unwrap());
static CHANNEL_NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d{1,20}$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// `@handle` or numeric chat id, same as the document key
    pub id: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
}

impl Channel {
    pub fn recipient(&self) -> Recipient {
        channel_recipient(&self.id)
    }
}

/// Normalize admin input into a channel id: `@handle`, `t.me/handle` links and numeric ids
/// are accepted
pub fn parse_channel_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let handle = trimmed
        .strip_prefix("https://t.me/")
        .or_else(|| trimmed.strip_prefix("t.me/"))
        .map(|name| format!("@{}", name.trim_end_matches('/')))
        .unwrap_or_else(|| trimmed.to_string());

    if CHANNEL_HANDLE.is_match(&handle) || CHANNEL_NUMERIC_ID.is_match(&handle) {
        Some(handle)
    } else {
        None
    }
}

/// Telegram recipient for a stored channel id
pub fn channel_recipient(id: &str) -> Recipient {
    match id.parse::<i64>() {
        Ok(numeric) => Recipient::Id(ChatId(numeric)),
        Err(_) => Recipient::ChannelUsername(id.to_string()),
    }
}

/// Managed channels, stored in channels.json
#[derive(Clone)]
pub struct ChannelStorage {
    documents: Arc<dyn DocumentStoreTrait>,
}

impl ChannelStorage {
    pub fn new(documents: Arc<dyn DocumentStoreTrait>) -> Self {
        Self { documents }
    }

    /// All channels ordered by id
    pub async fn list_channels(&self) -> Vec<Channel> {
        let channels = self.documents.load(Domain::Channels).await;
        let mut channels: Vec<Channel> = decode_records(Domain::Channels, channels)
            .into_iter()
            .map(|(_, channel)| channel)
            .collect();
        channels.sort_by(|a, b| a.id.cmp(&b.id));
        channels
    }

    pub async fn get_channel(&self, id: &str) -> Option<Channel> {
        let channels = self.documents.load(Domain::Channels).await;
        decode_record(Domain::Channels, &channels, id)
    }

    /// Add a channel; false if it is already managed
    pub async fn add_channel(&self, id: &str, title: &str) -> bool {
        let mut channels = self.documents.load(Domain::Channels).await;
        if channels.contains_key(id) {
            return false;
        }
        let channel = Channel {
            id: id.to_string(),
            title: title.to_string(),
            added_at: Utc::now(),
        };
        let Some(value) = encode_record(Domain::Channels, &channel) else {
            return false;
        };
        channels.insert(channel.id, value);
        self.documents.save(Domain::Channels, &channels).await
    }

    /// Remove a channel; false if it wasn't managed
    pub async fn remove_channel(&self, id: &str) -> bool {
        let mut channels = self.documents.load(Domain::Channels).await;
        if channels.remove(id).is_none() {
            return false;
        }
        self.documents.save(Domain::Channels, &channels).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storages::document_store::MemoryDocumentStore;

    fn storage() -> ChannelStorage {
        ChannelStorage::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[test]
    fn test_parse_channel_id() {
        assert_eq!(parse_channel_id("@news_feed"), Some("@news_feed".to_string()));
        assert_eq!(parse_channel_id("  @news_feed "), Some("@news_feed".to_string()));
        assert_eq!(parse_channel_id("https://t.me/news_feed"), Some("@news_feed".to_string()));
        assert_eq!(parse_channel_id("t.me/news_feed/"), Some("@news_feed".to_string()));
        assert_eq!(parse_channel_id("-1001234567890"), Some("-1001234567890".to_string()));
        assert_eq!(parse_channel_id("@abc"), None);
        assert_eq!(parse_channel_id("news feed"), None);
        assert_eq!(parse_channel_id(""), None);
    }

    #[test]
    fn test_channel_recipient() {
        assert_eq!(
            channel_recipient("-1001234567890"),
            Recipient::Id(ChatId(-1001234567890))
        );
        assert_eq!(
            channel_recipient("@news_feed"),
            Recipient::ChannelUsername("@news_feed".to_string())
        );
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let storage = storage();
        assert!(storage.add_channel("@zeta_news", "@zeta_news").await);
        assert!(storage.add_channel("@alpha_news", "Alpha").await);
        assert!(!storage.add_channel("@alpha_news", "Alpha again").await);

        let ids: Vec<String> = storage.list_channels().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["@alpha_news", "@zeta_news"]);
        assert_eq!(storage.get_channel("@alpha_news").await.unwrap().title, "Alpha");

        assert!(storage.remove_channel("@alpha_news").await);
        assert!(!storage.remove_channel("@alpha_news").await);
        assert!(storage.get_channel("@alpha_news").await.is_none());
        assert_eq!(storage.list_channels().await.len(), 1);
    }
}
