//! Canonical text layer.
//!
//! Turns the raw text of a submitted or stored document into the ordered
//! word tokens that shingling runs over.
//!
//! ## What we do
//!
//! - Strip structural boilerplate: title page, table of contents, appendices
//! - Unicode normalization (NFKC by default, configurable)
//! - Locale-free lowercasing
//! - Split words on whitespace and punctuation
//! - Tokens carry byte offsets into the canonical text
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. Same text and config give
//! the same tokens on any machine, which is what keeps stored signatures
//! comparable with freshly computed ones.
//!
//! ```
//! use canonical::{canonicalize, CanonicalizeConfig};
//!
//! let doc = canonicalize("The quick, brown fox!", &CanonicalizeConfig::default()).unwrap();
//! assert_eq!(doc.canonical_text, "the quick brown fox");
//! assert_eq!(doc.tokens.len(), 4);
//! ```

mod boilerplate;
mod config;
mod document;
mod error;
mod pipeline;
mod token;

pub use crate::boilerplate::{strip_boilerplate, strip_boilerplate_with_report, BoilerplateReport};
pub use crate::config::CanonicalizeConfig;
pub use crate::document::CanonicalizedDocument;
pub use crate::error::CanonicalError;
pub use crate::pipeline::canonicalize;
pub use crate::token::Token;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boilerplate_is_skipped_before_tokenizing() {
        let paragraph = "Shingling compares documents through overlapping word windows.\n";
        let text = format!("{}Appendix B\nsecret listing\n", paragraph.repeat(10));
        let cfg = CanonicalizeConfig::default();

        let doc = canonicalize(&text, &cfg).unwrap();
        assert!(doc.boilerplate.appendix_bytes > 0);
        assert!(!doc.words().any(|w| w == "listing"));

        let raw = canonicalize(&text, &cfg.clone().with_strip_boilerplate(false)).unwrap();
        assert!(raw.words().any(|w| w == "listing"));
        assert!(!raw.boilerplate.any());
    }
}
