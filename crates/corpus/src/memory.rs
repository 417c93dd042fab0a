use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use crate::error::CorpusError;
use crate::model::{candidates, round_originality, CorpusDocument, CorpusEntry, DocumentId};
use crate::retention::RetentionPolicy;
use crate::store::CorpusStore;

#[derive(Debug, Default)]
struct Records {
    next_id: DocumentId,
    /// Append order, oldest first.
    documents: Vec<CorpusDocument>,
}

/// An in-memory store using a `RwLock` around a `Vec`. Useful for tests and
/// short-lived processes.
#[derive(Debug, Default)]
pub struct InMemoryCorpus {
    records: RwLock<Records>,
    retention: RetentionPolicy,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            records: RwLock::default(),
            retention,
        }
    }

    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }
}

impl CorpusStore for InMemoryCorpus {
    fn fetch_candidates(
        &self,
        exclude_owner: Option<&str>,
        institution: Option<&str>,
    ) -> Result<Vec<CorpusDocument>, CorpusError> {
        let now = Utc::now();
        {
            let guard = self
                .records
                .read()
                .map_err(|_| CorpusError::backend("poisoned lock"))?;
            if !self.retention.any_expired(&guard.documents, now) {
                return Ok(candidates(&guard.documents, exclude_owner, institution));
            }
        }

        let mut guard = self
            .records
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let purged = self.retention.purge(&mut guard.documents, now);
        if purged > 0 {
            debug!(purged, "expired drafts removed");
        }
        Ok(candidates(&guard.documents, exclude_owner, institution))
    }

    fn append(&self, entry: CorpusEntry) -> Result<DocumentId, CorpusError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        guard.next_id += 1;
        let id = guard.next_id;
        guard.documents.push(entry.into_document(id));
        Ok(id)
    }

    fn remove(&self, id: DocumentId) -> Result<bool, CorpusError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        let before = guard.documents.len();
        guard.documents.retain(|doc| doc.id != id);
        Ok(guard.documents.len() != before)
    }

    fn set_originality(&self, id: DocumentId, percent: f64) -> Result<bool, CorpusError> {
        let percent = round_originality(percent)?;
        let mut guard = self
            .records
            .write()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        match guard.documents.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.originality_percent = Some(percent);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get(&self, id: DocumentId) -> Result<CorpusDocument, CorpusError> {
        let guard = self
            .records
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
            .records
            .read()
            .map_err(|_| CorpusError::backend("poisoned lock"))?;
        Ok(guard.documents.len())
    }
}
