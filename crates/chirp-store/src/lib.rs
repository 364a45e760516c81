pub mod document;
pub mod queries;

pub use document::Document;
pub use queries::SortOrder;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use chirp_types::{Error, Result};

/// The single on-disk JSON document, guarded by a read/write lock.
///
/// Every operation loads the whole document, works on the in-memory copy,
/// and (for writes) serializes the whole document back. Multiple reads may
/// proceed together; a write excludes everything else. The lock is scoped
/// to this instance; a second process pointed at the same file has no lock
/// interoperability and can corrupt the document.
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Opens a store at `path`, creating an empty document file if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !fs::exists(&path)? {
            let doc = Document::default();
            fs::write(&path, serde_json::to_vec(&doc)?)?;
        }

        info!("Document store opened at {}", path.display());
        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    /// Opens the store at `CHIRP_DB_PATH`, with a development fallback.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("CHIRP_DB_PATH").unwrap_or_else(|_| "chirps.json".into());
        Self::open(path)
    }

    /// Runs `f` against the current document under the shared lock.
    pub fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> Result<T>,
    {
        let _guard = self
            .lock
            .read()
            .map_err(|_| Error::Storage("document lock poisoned".into()))?;
        let doc = self.load()?;
        f(&doc)
    }

    /// Runs `f` against the current document under the exclusive lock,
    /// persisting the document afterwards. If `f` fails, nothing is
    /// written and the caller never observes a partial update.
    pub fn write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self
            .lock
            .write()
            .map_err(|_| Error::Storage("document lock poisoned".into()))?;
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.persist(&doc)?;
        Ok(out)
    }

    /// A missing or zero-length file is an empty document; malformed JSON
    /// is a storage failure, never silently reset.
    fn load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(err) => return Err(err.into()),
        };

        if bytes.is_empty() {
            return Ok(Document::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self, doc: &Document) -> Result<()> {
        let bytes = serde_json::to_vec(doc)?;
        fs::write(&self.path, bytes)?;
        debug!(
            chirps = doc.chirps.len(),
            users = doc.users.len(),
            tokens = doc.tokens.len(),
            "document persisted"
        );
        Ok(())
    }
}
