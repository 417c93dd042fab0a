use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::boilerplate::strip_boilerplate_with_report;
use crate::config::CanonicalizeConfig;
use crate::document::CanonicalizedDocument;
use crate::error::CanonicalError;
use crate::token::Token;

/// Turn raw document text into canonical word tokens.
///
/// Boilerplate is stripped first (when enabled), then the remaining body is
/// NFKC-normalized, lowercased and split on whitespace and punctuation.
/// Text that contains no words yields a document with no tokens; deciding
/// whether that is acceptable is up to the caller.
pub fn canonicalize(
    input: &str,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalizedDocument, CanonicalError> {
    cfg.validate()?;

    let (body, report) = if cfg.strip_boilerplate {
        strip_boilerplate_with_report(input)
    } else {
        (input, Default::default())
    };
    if report.any() {
        tracing::debug!(
            title_page = report.title_page_bytes,
            table_of_contents = report.table_of_contents_bytes,
            appendices = report.appendix_bytes,
            "stripped document boilerplate"
        );
    }

    // Unicode normalization can change character boundaries, so it runs first.
    let normalized_text: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(body.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(body)
    };

    let mut state = TokenizerState {
        canonical_text: String::with_capacity(normalized_text.len()),
        tokens: Vec::with_capacity((normalized_text.len() / 6).saturating_add(1)),
        pending_space: false,
        current_token_start: None,
    };

    for grapheme in normalized_text.graphemes(true) {
        // Lowercasing can expand a single character into several.
        if cfg.lowercase {
            for lower in grapheme.to_lowercase().chars() {
                state.dispatch(lower, cfg);
            }
        } else {
            for ch in grapheme.chars() {
                state.dispatch(ch, cfg);
            }
        }
    }
    state.finalize_token();

    Ok(CanonicalizedDocument {
        canonical_text: state.canonical_text,
        tokens: state.tokens,
        canonical_version: cfg.version,
        boilerplate: report,
    })
}

struct TokenizerState {
    canonical_text: String,
    tokens: Vec<Token>,
    pending_space: bool,
    current_token_start: Option<usize>,
}

impl TokenizerState {
    fn dispatch(&mut self, ch: char, cfg: &CanonicalizeConfig) {
        let is_delim = ch.is_whitespace() || (cfg.strip_punctuation && is_word_break(ch));
        if is_delim {
            self.finalize_token();
            if !self.canonical_text.is_empty() {
                self.pending_space = true;
            }
        } else {
            self.append_char(ch);
        }
    }

    fn append_char(&mut self, ch: char) {
        if self.pending_space {
            self.canonical_text.push(' ');
            self.pending_space = false;
            self.current_token_start = Some(self.canonical_text.len());
        } else if self.current_token_start.is_none() {
            self.current_token_start = Some(self.canonical_text.len());
        }
        self.canonical_text.push(ch);
    }

    fn finalize_token(&mut self) {
        if let Some(start) = self.current_token_start.take() {
            let end = self.canonical_text.len();
            if start < end {
                self.tokens.push(Token {
                    text: self.canonical_text[start..end].to_string(),
                    start,
                    end,
                });
            }
        }
    }
}

/// Punctuation and symbols that separate words ("§", "«", "—", "+").
fn is_word_break(ch: char) -> bool {
    ch.is_punctuation() || ch.is_symbol()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(doc: &CanonicalizedDocument) -> Vec<&str> {
        doc.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize("Hello, world! It's  MinHash: 100% fun.", &cfg).unwrap();
        assert_eq!(doc.canonical_text, "hello world it s minhash 100 fun");
        assert_eq!(words(&doc), vec!["hello", "world", "it", "s", "minhash", "100", "fun"]);
    }

    #[test]
    fn cyrillic_is_lowercased_without_locale() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize("АНАЛИЗ «Данных» — ОБЗОР", &cfg).unwrap();
        assert_eq!(words(&doc), vec!["анализ", "данных", "обзор"]);
    }

    #[test]
    fn unicode_equivalence_nfkc() {
        let cfg = CanonicalizeConfig::default();
        let a = canonicalize("Caf\u{00E9} au lait", &cfg).unwrap();
        let b = canonicalize("Cafe\u{0301} AU lait", &cfg).unwrap();
        assert_eq!(a.canonical_text, b.canonical_text);
        assert_eq!(a.tokens, b.tokens);
    }

    #[test]
    fn token_offsets_point_into_canonical_text() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize(" a\u{10348}b  c ", &cfg).unwrap();
        for token in &doc.tokens {
            assert_eq!(&doc.canonical_text[token.start..token.end], token.text);
        }
        assert_eq!(doc.tokens.len(), 2);
    }

    #[test]
    fn blank_input_yields_no_tokens() {
        let cfg = CanonicalizeConfig::default();
        let doc = canonicalize("  ... !!! ", &cfg).unwrap();
        assert!(doc.is_empty());
        assert!(doc.canonical_text.is_empty());
    }

    #[test]
    fn punctuation_kept_when_not_stripping() {
        let cfg = CanonicalizeConfig::default().with_strip_punctuation(false);
        let doc = canonicalize("Hello, world!", &cfg).unwrap();
        assert_eq!(words(&doc), vec!["hello,", "world!"]);
    }

    #[test]
    fn invalid_config_version_rejected() {
        let cfg = CanonicalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            canonicalize("content", &cfg),
            Err(CanonicalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn deterministic_across_calls() {
        let cfg = CanonicalizeConfig::default();
        let text = "Один и тот же текст, дважды. The same text, twice.";
        assert_eq!(canonicalize(text, &cfg).unwrap(), canonicalize(text, &cfg).unwrap());
    }
}
