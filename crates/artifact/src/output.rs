//! Named output files produced by a compile.

use serde::{Deserialize, Serialize};

/// A single compiler output file.
///
/// Text outputs (hex, source maps) are carried as strings; binary outputs
/// (UF2 images) as raw bytes. Binary data is base64-encoded in JSON so the
/// bundle can be posted to the local development server as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum OutputFile {
    Text(String),
    Binary(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl OutputFile {
    /// Returns the content as bytes regardless of representation.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutputFile::Text(s) => s.as_bytes(),
            OutputFile::Binary(b) => b,
        }
    }

    /// Returns the text content, if this is a text output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutputFile::Text(s) => Some(s),
            OutputFile::Binary(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFile::Text(_))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Custom base64 serde module for binary outputs in JSON.
mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(data).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_base64_roundtrip() {
        let out = OutputFile::Binary(vec![0x48, 0x65, 0x6c, 0x6c, 0x6f]);
        let json = serde_json::to_string(&out).unwrap();
        // "Hello" = "SGVsbG8="
        assert!(json.contains("SGVsbG8="));
        let parsed: OutputFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, out);
    }

    #[test]
    fn text_roundtrip() {
        let out = OutputFile::Text(":10000000AABBCCDD".into());
        let json = serde_json::to_string(&out).unwrap();
        let parsed: OutputFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, out);
    }

    #[test]
    fn as_bytes_covers_both_kinds() {
        assert_eq!(OutputFile::Text("ab".into()).as_bytes(), b"ab");
        assert_eq!(OutputFile::Binary(vec![1, 2]).as_bytes(), &[1, 2]);
        assert!(OutputFile::Text("ab".into()).is_text());
        assert!(OutputFile::Binary(vec![]).is_empty());
    }
}
