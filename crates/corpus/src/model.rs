//! Corpus document model.

use std::fmt;

use chrono::{DateTime, Utc};
use perceptual::Signature;
use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Store-assigned document identifier.
pub type DocumentId = u64;

/// Kind of work a document belongs to.
///
/// Known kinds get their own variant and are recognized regardless of case
/// and surrounding whitespace. Anything else keeps its spelling (trimmed), so
/// scoping by an unknown category requires a case-sensitive match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Diploma,
    Coursework,
    Lab,
    Practice,
    #[default]
    Uncategorized,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Diploma => "diploma",
            Category::Coursework => "coursework",
            Category::Lab => "lab",
            Category::Practice => "practice",
            Category::Uncategorized => "uncategorized",
            Category::Other(name) => name,
        }
    }

    /// Coursework and diploma papers are checked against each other.
    pub fn is_thesis_like(&self) -> bool {
        matches!(self, Category::Diploma | Category::Coursework)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "diploma" => Category::Diploma,
            "coursework" => Category::Coursework,
            "lab" => Category::Lab,
            "practice" => Category::Practice,
            "" | "uncategorized" => Category::Uncategorized,
            _ => Category::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a stored document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Submitted only for checking; subject to retention.
    #[default]
    Draft,
    /// Accepted into the corpus permanently.
    Final,
}

/// Document as held by a store. Only the signature of the text is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub signature: Signature,
    #[serde(default)]
    pub shingle_count: usize,
    /// Originality recorded after a final check, in percent with two
    /// decimals. Set through
    /// [`CorpusStore::set_originality`](crate::CorpusStore::set_originality).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originality_percent: Option<f64>,
}

/// Document handed to [`CorpusStore::append`](crate::CorpusStore::append);
/// the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub title: Option<String>,
    pub category: Category,
    pub institution: Option<String>,
    pub owner: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub signature: Signature,
    pub shingle_count: usize,
}

impl CorpusEntry {
    pub fn into_document(self, id: DocumentId) -> CorpusDocument {
        CorpusDocument {
            id,
            title: self.title,
            category: self.category,
            institution: self.institution,
            owner: self.owner,
            status: self.status,
            created_at: self.created_at,
            signature: self.signature,
            shingle_count: self.shingle_count,
            originality_percent: None,
        }
    }
}

/// Validate an originality percentage and round it to two decimals.
pub fn round_originality(percent: f64) -> Result<f64, CorpusError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(CorpusError::invalid(format!(
            "originality must be within 0..=100, got {percent}"
        )));
    }
    Ok((percent * 100.0).round() / 100.0)
}

/// Owner / institution filter shared by every store.
///
/// A document without an owner is never excluded; a document without an
/// institution never matches an institution filter.
pub fn passes_filters(
    doc: &CorpusDocument,
    exclude_owner: Option<&str>,
    institution: Option<&str>,
) -> bool {
    if let Some(owner) = exclude_owner {
        if doc.owner.as_deref() == Some(owner) {
            return false;
        }
    }
    match institution {
        Some(inst) => doc.institution.as_deref() == Some(inst),
        None => true,
    }
}

/// Filtered copies of `documents`, newest first.
pub(crate) fn candidates(
    documents: &[CorpusDocument],
    exclude_owner: Option<&str>,
    institution: Option<&str>,
) -> Vec<CorpusDocument> {
    documents
        .iter()
        .rev()
        .filter(|doc| passes_filters(doc, exclude_owner, institution))
        .cloned()
        .collect()
}
