use crate::error::CorpusError;
use crate::model::{CorpusDocument, CorpusEntry, DocumentId};

/// Storage for fingerprinted corpus documents.
///
/// Implementations must be safe to share across threads. Every document
/// handed out is a complete copy; callers never observe partial writes.
pub trait CorpusStore: Send + Sync {
    /// Candidates for a check, newest first.
    ///
    /// Documents owned by `exclude_owner` are left out, and when
    /// `institution` is set only that institution's documents are returned.
    /// Expired drafts are never returned. Readers share the store; it is
    /// locked exclusively only while expired drafts are purged.
    fn fetch_candidates(
        &self,
        exclude_owner: Option<&str>,
        institution: Option<&str>,
    ) -> Result<Vec<CorpusDocument>, CorpusError>;

    /// Append a document and return its new id.
    fn append(&self, entry: CorpusEntry) -> Result<DocumentId, CorpusError>;

    /// Remove a document. Returns `false` when the id was unknown.
    fn remove(&self, id: DocumentId) -> Result<bool, CorpusError>;

    /// Record the originality of a checked document, rounded to two
    /// decimals. Returns `false` when the id was unknown; a percentage
    /// outside `0..=100` is [`CorpusError::Invalid`].
    fn set_originality(&self, id: DocumentId, percent: f64) -> Result<bool, CorpusError>;

    /// Look up a single document.
    fn get(&self, id: DocumentId) -> Result<CorpusDocument, CorpusError>;

    /// Number of stored documents, expired drafts included until purged.
    fn len(&self) -> Result<usize, CorpusError>;

    fn is_empty(&self) -> Result<bool, CorpusError> {
        Ok(self.len()? == 0)
    }
}
