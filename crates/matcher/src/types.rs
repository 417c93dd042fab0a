use canonical::CanonicalError;
use corpus::{Category, CorpusError, DocumentId, DocumentStatus};
use perceptual::PerceptualError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of ranked matches returned by a check.
pub const DEFAULT_TOP_K: usize = 5;
/// Default minimum length of a submitted text, in characters.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Matcher-wide settings, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: String,
    /// Number of matches returned when the scope does not say otherwise.
    #[serde(default = "MatchConfig::default_top_k")]
    pub top_k: usize,
    /// Texts shorter than this many characters are rejected.
    #[serde(default = "MatchConfig::default_min_text_chars")]
    pub min_text_chars: usize,
    /// Compare candidates on the rayon pool.
    #[serde(default = "MatchConfig::default_parallel")]
    pub parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_version() -> String {
        "v1".to_string()
    }

    pub(crate) fn default_top_k() -> usize {
        DEFAULT_TOP_K
    }

    pub(crate) fn default_min_text_chars() -> usize {
        DEFAULT_MIN_TEXT_CHARS
    }

    pub(crate) fn default_parallel() -> bool {
        true
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_text_chars(mut self, min: usize) -> Self {
        self.min_text_chars = min;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "config.version must not be empty".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(MatchError::InvalidConfig(
                "top_k must be greater than zero".into(),
            ));
        }
        if self.min_text_chars == 0 {
            return Err(MatchError::InvalidConfig(
                "min_text_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            top_k: Self::default_top_k(),
            min_text_chars: Self::default_min_text_chars(),
            parallel: Self::default_parallel(),
        }
    }
}

/// Which corpus documents a check is compared against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScopeParams {
    /// Requesting owner; their own documents are never candidates.
    #[serde(default)]
    pub exclude_owner: Option<String>,
    /// A specific document to leave out, e.g. the one being re-checked.
    #[serde(default)]
    pub exclude_document: Option<DocumentId>,
    /// Only compare against this institution's documents.
    #[serde(default)]
    pub institution: Option<String>,
    /// Category filter; `None` or `"all"` keeps every category.
    #[serde(default)]
    pub category: Option<String>,
    /// Overrides [`MatchConfig::top_k`].
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl ScopeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding_owner(mut self, owner: impl Into<String>) -> Self {
        self.exclude_owner = Some(owner.into());
        self
    }

    pub fn excluding_document(mut self, id: DocumentId) -> Self {
        self.exclude_document = Some(id);
        self
    }

    pub fn at_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn category_scope(&self) -> CategoryScope {
        CategoryScope::parse(self.category.as_deref())
    }
}

/// Category filter resolved from [`ScopeParams::category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    /// Coursework and diploma papers cross-check each other.
    Thesis,
    Exact(Category),
}

impl CategoryScope {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return CategoryScope::All;
        };
        if raw.eq_ignore_ascii_case("all") {
            return CategoryScope::All;
        }
        let category = Category::from(raw);
        if category.is_thesis_like() {
            CategoryScope::Thesis
        } else {
            CategoryScope::Exact(category)
        }
    }

    pub fn admits(&self, category: &Category) -> bool {
        match self {
            CategoryScope::All => true,
            CategoryScope::Thesis => category.is_thesis_like(),
            CategoryScope::Exact(expected) => expected == category,
        }
    }
}

/// One ranked match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonResult {
    pub document_id: DocumentId,
    pub category: Category,
    /// Estimated similarity, rounded to a whole percent in `[0, 100]`.
    pub similarity: u8,
}

/// Outcome of a check. An empty corpus yields an empty list and 100 %
/// uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    /// At most `top_k` matches, most similar first; ties keep corpus order.
    pub similar_documents: Vec<ComparisonResult>,
    pub uniqueness_percent: u8,
    /// Number of documents compared after all scope filters.
    pub total_documents_checked: usize,
    pub processing_time_ms: u64,
}

impl CheckResult {
    pub fn top_similarity(&self) -> Option<u8> {
        self.similar_documents.first().map(|r| r.similarity)
    }
}

/// A document to fingerprint and add to the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDocument {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
}

impl NewDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            category: Category::default(),
            institution: None,
            owner: None,
            status: DocumentStatus::Final,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Rejected input; nothing was computed.
    #[error("validation error: {0}")]
    Validation(String),
    /// A stored signature was produced under a different configuration.
    #[error("signature length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// The corpus store failed; no result was produced.
    #[error("corpus retrieval failed: {0}")]
    Retrieval(#[from] CorpusError),
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("perceptual error: {0}")]
    Perceptual(PerceptualError),
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

impl From<PerceptualError> for MatchError {
    fn from(err: PerceptualError) -> Self {
        match err {
            PerceptualError::LengthMismatch { left, right } => {
                MatchError::LengthMismatch { left, right }
            }
            other => MatchError::Perceptual(other),
        }
    }
}
