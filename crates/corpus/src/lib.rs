//! # Corpus
//!
//! Storage of fingerprinted documents behind the [`CorpusStore`] trait.
//! Stores keep only a document's MinHash signature and metadata, never its
//! text.
//!
//! Out of the box:
//!
//! - [`InMemoryCorpus`]: `RwLock`-guarded vector, for tests and ephemeral use.
//! - [`JsonFileCorpus`]: a single JSON file rewritten atomically on every
//!   change.
//!
//! Both apply a [`RetentionPolicy`] when candidates are fetched: drafts that
//! reach the policy's lifetime (24 hours by default) are purged. A recorded
//! originality can be attached to a document with
//! [`CorpusStore::set_originality`].
//!
//! ```
//! use chrono::Utc;
//! use corpus::{Category, CorpusEntry, CorpusStore, DocumentStatus, InMemoryCorpus};
//! use perceptual::Signature;
//!
//! let store = InMemoryCorpus::new();
//! store
//!     .append(CorpusEntry {
//!         title: Some("Shingle methods".into()),
//!         category: Category::Coursework,
//!         institution: None,
//!         owner: Some("u2".into()),
//!         status: DocumentStatus::Final,
//!         created_at: Utc::now(),
//!         signature: Signature::from_entries(vec![1, 2, 3]),
//!         shingle_count: 3,
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.fetch_candidates(Some("u1"), None).unwrap().len(), 1);
//! assert!(store.fetch_candidates(Some("u2"), None).unwrap().is_empty());
//! ```

mod error;
mod json_file;
mod memory;
mod model;
mod retention;
mod store;

pub use crate::error::CorpusError;
pub use crate::json_file::JsonFileCorpus;
pub use crate::memory::InMemoryCorpus;
pub use crate::model::{
    passes_filters, round_originality, Category, CorpusDocument, CorpusEntry, DocumentId,
    DocumentStatus,
};
pub use crate::retention::{RetentionPolicy, DEFAULT_DRAFT_TTL_SECS};
pub use crate::store::CorpusStore;
