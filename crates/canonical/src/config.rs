//! Configuration types for the canonical text pipeline.
//!
//! [`CanonicalizeConfig`] controls how raw document text is turned into the
//! word tokens that feed shingling. The `version` field takes part in the
//! signature metadata: any change that alters the produced tokens must bump
//! it, because stored signatures built with the old tokens stop being
//! comparable.
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.strip_punctuation);
//! assert!(config.lowercase);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the canonical text pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizeConfig {
    /// Version of the canonicalization rules. Must be >= 1.
    pub version: u32,

    /// Apply Unicode NFKC normalization before other transforms.
    ///
    /// Composed and decomposed forms (`"é"` vs `"e\u{0301}"`) then produce the
    /// same tokens, which keeps signatures stable across text extractors.
    pub normalize_unicode: bool,

    /// Treat Unicode punctuation as a word delimiter.
    ///
    /// Shingles are built over words, so `"анализ,"` and `"анализ"` must be
    /// the same token. Enabled by default.
    pub strip_punctuation: bool,

    /// Apply locale-free Unicode lowercasing.
    pub lowercase: bool,

    /// Strip title page, table of contents and appendices before tokenizing.
    #[serde(default = "CanonicalizeConfig::default_strip_boilerplate")]
    pub strip_boilerplate: bool,
}

impl CanonicalizeConfig {
    pub(crate) fn default_strip_boilerplate() -> bool {
        true
    }

    pub fn with_strip_boilerplate(mut self, strip: bool) -> Self {
        self.strip_boilerplate = strip;
        self
    }

    pub fn with_strip_punctuation(mut self, strip: bool) -> Self {
        self.strip_punctuation = strip;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            strip_punctuation: true,
            lowercase: true,
            strip_boilerplate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CanonicalizeConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_version_rejected() {
        let cfg = CanonicalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CanonicalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_strip_boilerplate_defaults_to_true() {
        let json = r#"{"version":1,"normalize_unicode":true,"strip_punctuation":true,"lowercase":true}"#;
        let cfg: CanonicalizeConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.strip_boilerplate);
    }
}
