use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::document_store::{Document, Domain};

/// Decode every entry of a document, skipping (and logging) entries that don't match `T`
pub fn decode_records<T: DeserializeOwned>(domain: Domain, document: Document) -> Vec<(String, T)> {
    document
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some((key, record)),
            Err(e) => {
                log::warn!("Skipping malformed entry {:?} in {}: {}", key, domain, e);
                None
            }
        })
        .collect()
}

/// Decode a single entry, `None` if it is absent or malformed
pub fn decode_record<T: DeserializeOwned>(domain: Domain, document: &Document, key: &str) -> Option<T> {
    let value = document.get(key)?.clone();
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Malformed entry {:?} in {}: {}", key, domain, e);
            None
        }
    }
}

pub fn encode_record<T: Serialize>(domain: Domain, record: &T) -> Option<Value> {
    match serde_json::to_value(record) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Failed to encode entry for {}: {}", domain, e);
            None
        }
    }
}
