//! Raw pipeline input and format classification

pub mod format;

pub use format::{classify, InputFormat};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Payload handed to the pipeline, either already-decoded text or raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum RawInput {
    Text(String),
    Bytes(Vec<u8>),
}

impl RawInput {
    /// Text view of the payload. Invalid UTF-8 is replaced rather than rejected.
    pub fn as_text_lossy(&self) -> Cow<'_, str> {
        match self {
            RawInput::Text(s) => Cow::Borrowed(s.as_str()),
            RawInput::Bytes(b) => String::from_utf8_lossy(b),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawInput::Text(s) => s.as_bytes(),
            RawInput::Bytes(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        RawInput::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        RawInput::Text(s)
    }
}

impl From<Vec<u8>> for RawInput {
    fn from(b: Vec<u8>) -> Self {
        RawInput::Bytes(b)
    }
}
