//! JSON file store.
//!
//! The whole corpus lives in one JSON document `{ "next_id": .., "documents": [..] }`.
//! Every mutation rewrites the file through a temporary sibling and an atomic
//! rename, so a crash never leaves a half-written corpus behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CorpusError;
use crate::model::{candidates, round_originality, CorpusDocument, CorpusEntry, DocumentId};
use crate::retention::RetentionPolicy;
use crate::store::CorpusStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    next_id: DocumentId,
    #[serde(default)]
    documents: Vec<CorpusDocument>,
}

/// File-backed store; the file is read once at open and kept in memory.
#[derive(Debug)]
pub struct JsonFileCorpus {
    path: PathBuf,
    state: RwLock<CorpusFile>,
    retention: RetentionPolicy,
}

impl JsonFileCorpus {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        Self::open_with_retention(path, RetentionPolicy::default())
    }

    pub fn open_with_retention<P: AsRef<Path>>(
        path: P,
        retention: RetentionPolicy,
    ) -> Result<Self, CorpusError> {
        retention.validate()?;
        let path = path.as_ref().to_path_buf();
        let mut state: CorpusFile = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => CorpusFile::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CorpusFile::default(),
            Err(err) => return Err(err.into()),
        };
        // Guard against a hand-edited file whose counter lags its ids.
        let max_id = state.documents.iter().map(|d| d.id).max().unwrap_or(0);
        state.next_id = state.next_id.max(max_id);
        info!(path = %path.display(), documents = state.documents.len(), "corpus opened");
        Ok(Self {
            path,
            state: RwLock::new(state),
            retention,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &CorpusFile) -> Result<(), CorpusError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(state)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "corpus persisted");
        Ok(())
    }
}

impl CorpusStore for JsonFileCorpus {
    fn fetch_candidates(
        &self,
        exclude_owner: Option<&str>,
        institution: Option<&str>,
    ) -> Result<Vec<CorpusDocument>, CorpusError> {
        let now = Utc::now();
        {
            let guard = self
                .state
                .read()
                .map_err(|_| CorpusError::backend("poisoned lock"))?;
            if !self.retention.any_expired(&guard.documents, now) {
                return Ok(candidates(&guard.documents, exclude_owner, institution));
            }
        }

        let mut guard = self
            .state
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let mut purged_state = guard.clone();
        let purged = self.retention.purge(&mut purged_state.documents, now);
        if purged > 0 {
            // Memory keeps the drafts until the file agrees, so a failed
            // write is retried on the next fetch.
            self.persist(&purged_state)?;
            *guard = purged_state;
            debug!(purged, "expired drafts removed");
        }
        Ok(candidates(&guard.documents, exclude_owner, institution))
    }

    fn append(&self, entry: CorpusEntry) -> Result<DocumentId, CorpusError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let id = guard.next_id + 1;
        guard.documents.push(entry.into_document(id));
        guard.next_id = id;
        if let Err(err) = self.persist(&guard) {
            guard.documents.pop();
            guard.next_id = id - 1;
            return Err(err);
        }
        Ok(id)
    }

    fn remove(&self, id: DocumentId) -> Result<bool, CorpusError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let Some(pos) = guard.documents.iter().position(|doc| doc.id == id) else {
            return Ok(false);
        };
        let removed = guard.documents.remove(pos);
        if let Err(err) = self.persist(&guard) {
            guard.documents.insert(pos, removed);
            return Err(err);
        }
        Ok(true)
    }

    fn set_originality(&self, id: DocumentId, percent: f64) -> Result<bool, CorpusError> {
        let percent = round_originality(percent)?;
        let mut guard = self
            .state
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let Some(pos) = guard.documents.iter().position(|doc| doc.id == id) else {
            return Ok(false);
        };
        let previous = guard.documents[pos].originality_percent.replace(percent);
        if let Err(err) = self.persist(&guard) {
            guard.documents[pos].originality_percent = previous;
            return Err(err);
        }
        Ok(true)
    }

    fn get(&self, id: DocumentId) -> Result<CorpusDocument, CorpusError> {
        let guard = self
            .state
            .read()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        guard
            .documents
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
            .ok_or(CorpusError::NotFound(id))
    }

    fn len(&self) -> Result<usize, CorpusError> {
        let guard = self
            .state
            .read()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        Ok(guard.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, DocumentStatus};
    use chrono::Duration;
    use perceptual::Signature;

    fn entry(owner: &str) -> CorpusEntry {
        CorpusEntry {
            title: None,
            category: Category::Diploma,
            institution: None,
            owner: Some(owner.into()),
            status: DocumentStatus::Final,
            created_at: Utc::now(),
            signature: Signature::from_entries(vec![4, 5, 6]),
            shingle_count: 3,
        }
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCorpus::open(dir.path().join("corpus.json")).unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.fetch_candidates(None, None).unwrap().is_empty());
    }

    #[test]
    fn documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("corpus.json");
        let first = {
            let store = JsonFileCorpus::open(&path).unwrap();
            let first = store.append(entry("u1")).unwrap();
            store.append(entry("u2")).unwrap();
            first
        };

        let store = JsonFileCorpus::open(&path).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        let doc = store.get(first).unwrap();
        assert_eq!(doc.owner.as_deref(), Some("u1"));
        assert_eq!(doc.signature, Signature::from_entries(vec![4, 5, 6]));

        let next = store.append(entry("u3")).unwrap();
        assert_eq!(next, 3);
    }

    #[test]
    fn file_layout_has_counter_and_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        store.append(entry("u1")).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["next_id"], 1);
        assert_eq!(value["documents"][0]["category"], "diploma");
        assert_eq!(value["documents"][0]["signature"], serde_json::json!([4, 5, 6]));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        let id = store.append(entry("u1")).unwrap();
        assert!(store.remove(id).unwrap());
        assert!(!store.remove(id).unwrap());
        drop(store);

        assert!(JsonFileCorpus::open(&path).unwrap().is_empty().unwrap());
    }

    #[test]
    fn expired_drafts_purged_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        store.append(expired_draft("u1")).unwrap();
        store.append(entry("u2")).unwrap();

        let docs = store.fetch_candidates(None, None).unwrap();
        assert_eq!(docs.len(), 1);
        drop(store);
        assert_eq!(JsonFileCorpus::open(&path).unwrap().len().unwrap(), 1);
    }

    fn expired_draft(owner: &str) -> CorpusEntry {
        let mut draft = entry(owner);
        draft.status = DocumentStatus::Draft;
        draft.created_at = Utc::now() - Duration::days(2);
        draft
    }

    #[test]
    fn failed_purge_write_keeps_drafts_for_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        store.append(expired_draft("u1")).unwrap();
        store.append(entry("u2")).unwrap();

        // A directory in the way of the temporary file makes every write fail.
        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir(&tmp).unwrap();
        assert!(store.fetch_candidates(None, None).is_err());
        assert_eq!(store.len().unwrap(), 2);

        std::fs::remove_dir(&tmp).unwrap();
        assert_eq!(store.fetch_candidates(None, None).unwrap().len(), 1);
        assert_eq!(store.len().unwrap(), 1);
        drop(store);
        assert_eq!(JsonFileCorpus::open(&path).unwrap().len().unwrap(), 1);
    }

    #[test]
    fn out_of_range_ttl_is_rejected_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let policy: RetentionPolicy =
            serde_json::from_str(r#"{"draft_ttl_secs": 9223372036854775807}"#).unwrap();
        assert!(matches!(
            JsonFileCorpus::open_with_retention(dir.path().join("corpus.json"), policy),
            Err(CorpusError::Invalid(_))
        ));
    }

    #[test]
    fn originality_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        let id = store.append(entry("u1")).unwrap();
        assert!(store.set_originality(id, 91.239).unwrap());
        assert!(!store.set_originality(id + 10, 10.0).unwrap());
        drop(store);

        let store = JsonFileCorpus::open(&path).unwrap();
        assert_eq!(store.get(id).unwrap().originality_percent, Some(91.24));
    }

    #[test]
    fn failed_originality_write_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let store = JsonFileCorpus::open(&path).unwrap();
        let id = store.append(entry("u1")).unwrap();

        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir(&tmp).unwrap();
        assert!(store.set_originality(id, 50.0).is_err());
        assert_eq!(store.get(id).unwrap().originality_percent, None);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            JsonFileCorpus::open(&path),
            Err(CorpusError::Serialization(_))
        ));
    }
}
