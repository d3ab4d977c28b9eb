//! Durable mirror of the session fields, one file per key.
//!
//! Absent keys rehydrate to the field default. A malformed structured value
//! is recovered silently as absent; persistence failures are logged and
//! never surfaced to the user.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use webrag_core::{IngestResult, PersistOp, SessionFields};
use webrag_logging::{rag_error, rag_info, rag_warn};

pub(crate) const ADDRESSES_FILE: &str = "urls.txt";
pub(crate) const QUESTION_FILE: &str = "question.txt";
pub(crate) const ANSWER_FILE: &str = "answer.txt";
pub(crate) const INGEST_RESULT_FILE: &str = "ingest_result.ron";

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".webrag_session";

/// Mirror struct for the one structured key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedIngest {
    chunks_stored: u64,
}

pub trait SessionStore {
    /// Rehydrate all fields. Called exactly once, before any `apply`.
    fn load(&self) -> SessionFields;
    /// Mirror a single field change. Infallible from the caller's view.
    fn apply(&self, op: &PersistOp);
}

pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn in_current_dir() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(cwd.join(DEFAULT_STATE_DIR))
    }

    fn read_text(&self, filename: &str) -> String {
        let path = self.dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                rag_warn!("Failed to read {:?}: {}", path, err);
                String::new()
            }
        }
    }

    fn read_ingest(&self) -> Option<IngestResult> {
        let path = self.dir.join(INGEST_RESULT_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                rag_warn!("Failed to read {:?}: {}", path, err);
                return None;
            }
        };

        match ron::from_str::<PersistedIngest>(&content) {
            Ok(persisted) => Some(IngestResult {
                chunks_stored: persisted.chunks_stored,
            }),
            Err(err) => {
                // Corrupt data is treated as absent, never as a crash.
                rag_warn!("Failed to parse {:?}: {}", path, err);
                None
            }
        }
    }

    fn write_text(&self, filename: &str, content: &str) {
        if let Err(err) = write_atomic(&self.dir, filename, content) {
            rag_error!("Failed to write {:?}/{}: {}", self.dir, filename, err);
        }
    }

    fn remove_key(&self, filename: &str) {
        let path = self.dir.join(filename);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => rag_warn!("Failed to remove {:?}: {}", path, err),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionFields {
        let fields = SessionFields {
            addresses: self.read_text(ADDRESSES_FILE),
            last_ingest: self.read_ingest(),
            question: self.read_text(QUESTION_FILE),
            answer: self.read_text(ANSWER_FILE),
        };
        rag_info!("Loaded persisted session from {:?}", self.dir);
        fields
    }

    fn apply(&self, op: &PersistOp) {
        match op {
            PersistOp::SaveAddresses(text) => self.write_text(ADDRESSES_FILE, text),
            PersistOp::SaveQuestion(text) => self.write_text(QUESTION_FILE, text),
            PersistOp::SaveAnswer(text) => self.write_text(ANSWER_FILE, text),
            PersistOp::SaveIngestResult(Some(result)) => {
                let persisted = PersistedIngest {
                    chunks_stored: result.chunks_stored,
                };
                match ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new()) {
                    Ok(content) => self.write_text(INGEST_RESULT_FILE, &content),
                    Err(err) => rag_error!("Failed to serialize ingest result: {}", err),
                }
            }
            // The store never holds a null placeholder for an absent result.
            PersistOp::SaveIngestResult(None) => self.remove_key(INGEST_RESULT_FILE),
            PersistOp::ClearAll => match fs::remove_dir_all(&self.dir) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => rag_warn!("Failed to clear {:?}: {}", self.dir, err),
            },
        }
    }
}

/// Write content to `{dir}/{filename}` via a temp file then rename.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let target = dir.join(filename);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace existing file if present to keep determinism.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}

/// In-memory store substitute so the controller can be tested in isolation.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemorySessionStore {
    inner: std::rc::Rc<std::cell::RefCell<MemoryInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MemoryInner {
    keys: std::collections::BTreeMap<String, String>,
    writes: usize,
}

#[cfg(test)]
impl MemorySessionStore {
    pub(crate) fn key_count(&self) -> usize {
        self.inner.borrow().keys.len()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().keys.get(key).cloned()
    }

    pub(crate) fn seed(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .keys
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionFields {
        let inner = self.inner.borrow();
        let text = |key: &str| inner.keys.get(key).cloned().unwrap_or_default();
        let last_ingest = inner
            .keys
            .get(INGEST_RESULT_FILE)
            .and_then(|raw| ron::from_str::<PersistedIngest>(raw).ok())
            .map(|persisted| IngestResult {
                chunks_stored: persisted.chunks_stored,
            });
        SessionFields {
            addresses: text(ADDRESSES_FILE),
            last_ingest,
            question: text(QUESTION_FILE),
            answer: text(ANSWER_FILE),
        }
    }

    fn apply(&self, op: &PersistOp) {
        let mut inner = self.inner.borrow_mut();
        inner.writes += 1;
        match op {
            PersistOp::SaveAddresses(text) => {
                inner.keys.insert(ADDRESSES_FILE.to_string(), text.clone());
            }
            PersistOp::SaveQuestion(text) => {
                inner.keys.insert(QUESTION_FILE.to_string(), text.clone());
            }
            PersistOp::SaveAnswer(text) => {
                inner.keys.insert(ANSWER_FILE.to_string(), text.clone());
            }
            PersistOp::SaveIngestResult(Some(result)) => {
                let persisted = PersistedIngest {
                    chunks_stored: result.chunks_stored,
                };
                if let Ok(content) = ron::to_string(&persisted) {
                    inner.keys.insert(INGEST_RESULT_FILE.to_string(), content);
                }
            }
            PersistOp::SaveIngestResult(None) => {
                inner.keys.remove(INGEST_RESULT_FILE);
            }
            PersistOp::ClearAll => inner.keys.clear(),
        }
    }
}
