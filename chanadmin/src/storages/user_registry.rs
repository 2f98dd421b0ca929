use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    document_store::{DocumentStoreTrait, Domain},
    records::{decode_records, encode_record},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Decimal Telegram user id, same as the document key
    #[serde(default)]
    pub id: String,
    pub username: Option<String>,
    pub first_name: String,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Registry of everyone who has talked to the bot, stored in users.json
#[derive(Clone)]
pub struct UserRegistry {
    documents: Arc<dyn DocumentStoreTrait>,
    admin_id: Option<u64>,
}

impl UserRegistry {
    pub fn new(documents: Arc<dyn DocumentStoreTrait>, admin_id: Option<u64>) -> Self {
        Self {
            documents,
            admin_id,
        }
    }

    /// Insert or replace the user's record.
    ///
    /// `is_admin` always comes from the configured admin id, never from the stored record, and
    /// `joined_at` is reset to now on every call.
    pub async fn register(&self, user_id: u64, username: Option<&str>, first_name: &str) -> User {
        let user = User {
            id: user_id.to_string(),
            username: username.map(str::to_string),
            first_name: first_name.to_string(),
            joined_at: Utc::now(),
            is_admin: self.admin_id == Some(user_id),
        };

        let mut users = self.documents.load(Domain::Users).await;
        if let Some(value) = encode_record(Domain::Users, &user) {
            users.insert(user.id.clone(), value);
            self.documents.save(Domain::Users, &users).await;
        }
        user
    }

    /// Whether the stored record of this user carries the admin flag; false for unknown users
    pub async fn is_admin(&self, user_id: u64) -> bool {
        let users = self.documents.load(Domain::Users).await;
        users
            .get(&user_id.to_string())
            .and_then(|user| user.get("is_admin"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// All registered users ordered by numeric id
    pub async fn list_users(&self) -> Vec<User> {
        let users = self.documents.load(Domain::Users).await;
        let mut users: Vec<User> = decode_records::<User>(Domain::Users, users)
            .into_iter()
            .map(|(key, mut user)| {
                if user.id.is_empty() {
                    user.id = key;
                }
                user
            })
            .collect();
        users.sort_by_key(|user| (user.id.parse::<u64>().unwrap_or(u64::MAX), user.id.clone()));
        users
    }
}
