use serde::{Deserialize, Serialize};

/// A word token with its UTF-8 byte offsets in the canonical text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Byte offset (inclusive) in the canonical text.
    pub start: usize,
    /// Byte offset (exclusive) in the canonical text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}
