//
// Flat JSON documents, one file per domain. Every mutation is read-full -> modify -> write-full
// with no locking: a single bot process is assumed to be the only writer. Concurrent writers
// would need per-domain locking or a transactional key-value store instead.
//

use std::{
    collections::HashMap,
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// Top-level mapping of a persisted document
pub type Document = Map<String, Value>;

/// The four independent persisted documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Users,
    Channels,
    ScheduledPosts,
    Settings,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Users,
        Domain::Channels,
        Domain::ScheduledPosts,
        Domain::Settings,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Domain::Users => "users.json",
            Domain::Channels => "channels.json",
            Domain::ScheduledPosts => "scheduled_posts.json",
            Domain::Settings => "settings.json",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a JSON object")]
    NotAnObject,
}

/// Trait for loading and saving whole documents
#[async_trait::async_trait]
pub trait DocumentStoreTrait: Send + Sync {
    /// Load a document. Missing documents are created empty, unreadable ones are reported
    /// in the log and treated as empty without touching what is stored.
    async fn load(&self, domain: Domain) -> Document;

    /// Overwrite a document. Failures are logged; the return value only says whether the
    /// write went through.
    async fn save(&self, domain: Domain, document: &Document) -> bool;
}

/// Document store keeping one pretty-printed JSON file per domain in a directory
#[derive(Clone)]
pub struct JsonFileStore {
    storage_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self, domain: Domain) -> PathBuf {
        self.storage_dir.join(domain.file_name())
    }

    /// Create the file with an empty object unless someone else created it first
    async fn create_empty(&self, domain: Domain) -> Result<(), StoreError> {
        fs::create_dir_all(&self.storage_dir).await?;
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.file_path(domain))
            .await;
        match file {
            Ok(mut file) => {
                file.write_all(b"{}").await?;
                file.flush().await?;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn try_save(&self, domain: Domain, document: &Document) -> Result<(), StoreError> {
        fs::create_dir_all(&self.storage_dir).await?;
        fs::write(self.file_path(domain), to_pretty_json(document)?).await?;
        Ok(())
    }
}

fn parse_document(content: &str) -> Result<Document, StoreError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Pretty-print with four space indentation
fn to_pretty_json(document: &Document) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

#[async_trait::async_trait]
impl DocumentStoreTrait for JsonFileStore {
    async fn load(&self, domain: Domain) -> Document {
        let file_path = self.file_path(domain);
        match fs::read_to_string(&file_path).await {
            Ok(content) => match parse_document(&content) {
                Ok(document) => document,
                Err(e) => {
                    log::error!("Error decoding {:?}: {}", file_path, e);
                    Document::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Err(e) = self.create_empty(domain).await {
                    log::error!("Error creating {:?}: {}", file_path, e);
                }
                Document::new()
            }
            Err(e) => {
                log::error!("Error reading {:?}: {}", file_path, e);
                Document::new()
            }
        }
    }

    async fn save(&self, domain: Domain, document: &Document) -> bool {
        match self.try_save(domain, document).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving to {:?}: {}", self.file_path(domain), e);
                false
            }
        }
    }
}

/// In-memory document store, used in tests and when no data directory is wanted
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    data: Arc<Mutex<HashMap<Domain, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStoreTrait for MemoryDocumentStore {
    async fn load(&self, domain: Domain) -> Document {
        let mut storage_guard = self.data.lock().await;
        storage_guard.entry(domain).or_default().clone()
    }

    async fn save(&self, domain: Domain, document: &Document) -> bool {
        let mut storage_guard = self.data.lock().await;
        storage_guard.insert(domain, document.clone());
        true
    }
}
