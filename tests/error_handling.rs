use std::fs;
use std::sync::Arc;

use shingleprint::{
    build_matcher, build_matcher_with_store, matcher_from_file, ConfigLoadError, CorpusError,
    EngineConfig, EngineError, InMemoryCorpus, MatchError, MinHasher, NewDocument,
    PerceptualConfig, ScopeParams,
};

const VALID: &str = "a perfectly ordinary paragraph that is long enough to be checked at all";

fn matcher() -> shingleprint::Matcher {
    build_matcher(&EngineConfig::default()).expect("default matcher")
}

#[test]
fn blank_text_is_rejected() {
    let err = matcher()
        .check_document("  \n\t ", &ScopeParams::new())
        .unwrap_err();
    assert!(matches!(err, MatchError::Validation(msg) if msg == "text is required"));
}

#[test]
fn short_text_is_rejected_before_ingest() {
    let matcher = matcher();
    let short = "x".repeat(49);

    let err = matcher.check_document(&short, &ScopeParams::new()).unwrap_err();
    assert!(matches!(err, MatchError::Validation(_)));

    let err = matcher.ingest_document(NewDocument::new(short)).unwrap_err();
    assert!(matches!(err, MatchError::Validation(_)));
    assert_eq!(matcher.store().len().unwrap(), 0);
}

#[test]
fn minimum_length_counts_characters() {
    // 50 two-byte characters: 100 bytes, exactly at the limit.
    let cyrillic = "ж".repeat(50);
    assert!(matcher().check_document(&cyrillic, &ScopeParams::new()).is_ok());
}

#[test]
fn zero_top_k_is_a_validation_error() {
    let err = matcher()
        .check_document(VALID, &ScopeParams::new().with_top_k(0))
        .unwrap_err();
    assert!(matches!(err, MatchError::Validation(_)));
}

#[test]
fn foreign_signature_length_is_reported() {
    let matcher = matcher();
    matcher
        .ingest_document(NewDocument::new(VALID).with_owner("u2"))
        .unwrap();

    let short_hasher = MinHasher::new(PerceptualConfig::default().with_signature_len(64)).unwrap();
    let words: Vec<&str> = VALID.split(' ').collect();
    let foreign = short_hasher.fingerprint(&words).signature;

    let err = matcher
        .check_signature(&foreign, &ScopeParams::new())
        .unwrap_err();
    assert!(matches!(
        err,
        MatchError::LengthMismatch {
            left: 64,
            right: 128
        }
    ));
}

#[test]
fn unsupported_config_version_is_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.version = "2.0".into();
    assert!(matches!(
        build_matcher(&cfg),
        Err(EngineError::Config(ConfigLoadError::UnsupportedVersion(_)))
    ));
}

#[test]
fn malformed_yaml_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "version: [unterminated\n").unwrap();
    assert!(matches!(
        matcher_from_file(&path),
        Err(EngineError::Config(ConfigLoadError::YamlParse(_)))
    ));
}

#[test]
fn corrupt_corpus_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus.json");
    fs::write(&corpus, "{ not json").unwrap();

    let mut cfg = EngineConfig::default();
    cfg.store.backend = "json_file".into();
    cfg.store.path = Some(corpus);
    assert!(matches!(
        build_matcher(&cfg),
        Err(EngineError::Store(CorpusError::Serialization(_)))
    ));
}

#[test]
fn invalid_section_values_surface_as_validation_errors() {
    let mut cfg = EngineConfig::default();
    cfg.perceptual.k = 0;
    let store = Arc::new(InMemoryCorpus::new());
    assert!(matches!(
        build_matcher_with_store(&cfg, store),
        Err(EngineError::Config(ConfigLoadError::Validation(_)))
    ));
}

#[test]
fn removing_unknown_document_is_not_an_error() {
    assert!(!matcher().remove_document(42).unwrap());
}
