//! YAML configuration for the shingleprint engine.
//!
//! One file describes every stage: canonicalization, shingling and MinHash,
//! the matcher and the corpus store. Missing sections fall back to their
//! defaults, so an empty document with just `version: "1.0"` is valid.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "faculty checker"
//!
//! canonical:
//!   version: 1
//!   normalize_unicode: true
//!   lowercase: true
//!   strip_punctuation: true
//!   strip_boilerplate: true
//!
//! perceptual:
//!   version: 1
//!   k: 5
//!   signature_len: 128
//!   seed: 17297687000019483309
//!   use_parallel: false
//!
//! matcher:
//!   version: "v1"
//!   top_k: 5
//!   min_text_chars: 50
//!   parallel: true
//!
//! store:
//!   backend: "json_file"
//!   path: "corpus.json"
//!   draft_ttl_hours: 24
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use canonical::CanonicalizeConfig;
use corpus::RetentionPolicy;
use matcher::MatchConfig;
use perceptual::PerceptualConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration for the whole engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub canonical: CanonicalYamlConfig,

    #[serde(default)]
    pub perceptual: PerceptualYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,

    #[serde(default)]
    pub store: StoreYamlConfig,
}

impl EngineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.canonical.validate()?;
        self.perceptual.validate()?;
        self.matcher.validate()?;
        self.store.validate()?;

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            canonical: CanonicalYamlConfig::default(),
            perceptual: PerceptualYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
            store: StoreYamlConfig::default(),
        }
    }
}

/// Canonicalization YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub normalize_unicode: bool,

    #[serde(default = "true_value")]
    pub lowercase: bool,

    #[serde(default = "true_value")]
    pub strip_punctuation: bool,

    #[serde(default = "true_value")]
    pub strip_boilerplate: bool,
}

impl CanonicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "canonical.version must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_canonical_config(&self) -> CanonicalizeConfig {
        CanonicalizeConfig {
            version: self.version,
            normalize_unicode: self.normalize_unicode,
            strip_punctuation: self.strip_punctuation,
            lowercase: self.lowercase,
            strip_boilerplate: self.strip_boilerplate,
        }
    }
}

impl Default for CanonicalYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
            strip_boilerplate: true,
        }
    }
}

/// Shingling and MinHash YAML configuration
///
/// `k`, `signature_len` and `seed` must never change for a populated corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptualYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_signature_len")]
    pub signature_len: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub use_parallel: bool,
}

impl PerceptualYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "perceptual.version must be >= 1".to_string(),
            ));
        }
        if self.k == 0 {
            return Err(ConfigLoadError::Validation(
                "perceptual.k must be >= 1".to_string(),
            ));
        }
        if self.signature_len == 0 {
            return Err(ConfigLoadError::Validation(
                "perceptual.signature_len must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_perceptual_config(&self) -> PerceptualConfig {
        PerceptualConfig {
            version: self.version,
            k: self.k,
            signature_len: self.signature_len,
            seed: self.seed,
            use_parallel: self.use_parallel,
        }
    }
}

impl Default for PerceptualYamlConfig {
    fn default() -> Self {
        let defaults = PerceptualConfig::default();
        Self {
            version: defaults.version,
            k: defaults.k,
            signature_len: defaults.signature_len,
            seed: defaults.seed,
            use_parallel: defaults.use_parallel,
        }
    }
}

/// Matcher YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchYamlConfig {
    #[serde(default = "default_match_version")]
    pub version: String,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    #[serde(default = "true_value")]
    pub parallel: bool,
}

impl MatchYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "matcher.version must not be empty".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(ConfigLoadError::Validation(
                "matcher.top_k must be >= 1".to_string(),
            ));
        }
        if self.min_text_chars == 0 {
            return Err(ConfigLoadError::Validation(
                "matcher.min_text_chars must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            version: self.version.clone(),
            top_k: self.top_k,
            min_text_chars: self.min_text_chars,
            parallel: self.parallel,
        }
    }
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            version: default_match_version(),
            top_k: default_top_k(),
            min_text_chars: default_min_text_chars(),
            parallel: true,
        }
    }
}

/// Corpus store YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreYamlConfig {
    /// `"in_memory"` or `"json_file"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Corpus file, required by the `json_file` backend.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Draft lifetime in hours; `null` keeps drafts forever.
    #[serde(default = "default_draft_ttl_hours")]
    pub draft_ttl_hours: Option<u32>,
}

impl StoreYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.backend.as_str() {
            "in_memory" => Ok(()),
            "json_file" => {
                if self.path.is_none() {
                    return Err(ConfigLoadError::MissingField("store.path".to_string()));
                }
                Ok(())
            }
            other => Err(ConfigLoadError::Validation(format!(
                "store.backend must be one of: in_memory, json_file (got {other})"
            ))),
        }
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            draft_ttl_secs: self.draft_ttl_hours.map(|hours| i64::from(hours) * 60 * 60),
        }
    }
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
            draft_ttl_hours: default_draft_ttl_hours(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_k() -> usize {
    perceptual::DEFAULT_SHINGLE_K
}
fn default_signature_len() -> usize {
    perceptual::DEFAULT_SIGNATURE_LEN
}
fn default_seed() -> u64 {
    perceptual::DEFAULT_SEED
}
fn default_match_version() -> String {
    "v1".to_string()
}
fn default_top_k() -> usize {
    matcher::DEFAULT_TOP_K
}
fn default_min_text_chars() -> usize {
    matcher::DEFAULT_MIN_TEXT_CHARS
}
fn default_backend() -> String {
    "in_memory".to_string()
}
fn default_draft_ttl_hours() -> Option<u32> {
    Some(24)
}
