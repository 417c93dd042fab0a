//! Draft retention.
//!
//! Documents submitted only for checking are stored as drafts and expire
//! after a fixed time. Final documents are kept forever.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CorpusError;
use crate::model::{CorpusDocument, DocumentStatus};

/// Default draft lifetime: 24 hours.
pub const DEFAULT_DRAFT_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Draft lifetime in seconds; `None` keeps drafts forever.
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_secs: Option<i64>,
}

fn default_draft_ttl() -> Option<i64> {
    Some(DEFAULT_DRAFT_TTL_SECS)
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            draft_ttl_secs: default_draft_ttl(),
        }
    }
}

impl RetentionPolicy {
    /// Never expire anything.
    pub fn keep_all() -> Self {
        Self {
            draft_ttl_secs: None,
        }
    }

    pub fn with_draft_ttl(ttl: Duration) -> Self {
        Self {
            draft_ttl_secs: Some(ttl.num_seconds()),
        }
    }

    /// Reject lifetimes that are negative or beyond what `chrono` can
    /// represent.
    pub fn validate(&self) -> Result<(), CorpusError> {
        match self.draft_ttl_secs {
            Some(ttl) if ttl < 0 => Err(CorpusError::invalid(format!(
                "draft_ttl_secs must not be negative, got {ttl}"
            ))),
            Some(ttl) if Duration::try_seconds(ttl).is_none() => Err(CorpusError::invalid(
                format!("draft_ttl_secs out of range: {ttl}"),
            )),
            _ => Ok(()),
        }
    }

    /// A draft expires once its age reaches the lifetime. A lifetime too
    /// large to represent never expires anything.
    pub fn is_expired(&self, doc: &CorpusDocument, now: DateTime<Utc>) -> bool {
        match (doc.status, self.draft_ttl_secs) {
            (DocumentStatus::Draft, Some(ttl)) => {
                Duration::try_seconds(ttl).is_some_and(|ttl| now - doc.created_at >= ttl)
            }
            _ => false,
        }
    }

    /// True when `purge` would remove something from `docs`.
    pub fn any_expired(&self, docs: &[CorpusDocument], now: DateTime<Utc>) -> bool {
        self.draft_ttl_secs.is_some() && docs.iter().any(|doc| self.is_expired(doc, now))
    }

    /// Drop expired drafts in place, returning how many were removed.
    pub fn purge(&self, docs: &mut Vec<CorpusDocument>, now: DateTime<Utc>) -> usize {
        if self.draft_ttl_secs.is_none() {
            return 0;
        }
        let before = docs.len();
        docs.retain(|doc| !self.is_expired(doc, now));
        before - docs.len()
    }
}
