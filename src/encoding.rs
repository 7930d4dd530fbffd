//! Base64 payloads for the git blob API.
//!
//! Files picked from disk are read as raw bytes and encoded untouched, so
//! binary content survives. Text buffers are encoded from their UTF-8 bytes,
//! which is what the git blob API expects for text.
use base64::{Engine, prelude::BASE64_STANDARD};
use log::*;
use std::path::PathBuf;

use crate::error::EncodingError;

/// Where the content of one file change comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Raw bytes already in memory (binary safe).
    Bytes(Vec<u8>),
    /// An editor style text buffer.
    Text(String),
    /// A file on the local filesystem, read when the commit is built.
    Path(PathBuf),
}

impl From<Vec<u8>> for FileSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for FileSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for FileSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for FileSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Encode raw bytes as standard, padded base64.
pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Encode a text buffer from its UTF-8 representation.
pub fn encode_text(text: &str) -> String {
    encode_bytes(text.as_bytes())
}

/// Decode base64 as returned by the contents API, which wraps lines with
/// newlines.
pub fn decode(content: &str) -> Result<Vec<u8>, EncodingError> {
    let stripped: String =
        content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(BASE64_STANDARD.decode(stripped)?)
}

/// Read (if needed) and encode a file source.
pub async fn encode(source: &FileSource) -> Result<String, EncodingError> {
    match source {
        FileSource::Bytes(bytes) => Ok(encode_bytes(bytes)),
        FileSource::Text(text) => Ok(encode_text(text)),
        FileSource::Path(path) => {
            debug!("reading file source: {}", path.display());
            let bytes = tokio::fs::read(path).await.map_err(|source| {
                EncodingError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            Ok(encode_bytes(&bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn encodes_text_as_utf8() {
        assert_eq!(encode_text("hello"), "aGVsbG8=");
        // multi-byte characters must go through their UTF-8 bytes
        assert_eq!(encode_text("čau ☃"), "xI1hdSDimIM=");
    }

    #[test]
    fn keeps_binary_bytes_intact() {
        let bytes = vec![0u8, 0xff, 0xfe, 0x80, 0x7f, 0x00];
        let encoded = encode_bytes(&bytes);
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn decodes_line_wrapped_content() {
        let decoded = decode("aGVs\nbG8g\nd29y\nbGQ=\n").unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn rejects_invalid_base64() {
        let result = decode("not base64!");
        assert!(matches!(result, Err(EncodingError::Decode(_))));
    }

    #[tokio::test]
    async fn encodes_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a]).unwrap();

        let source = FileSource::Path(file.path().to_path_buf());
        let encoded = encode(&source).await.unwrap();

        assert_eq!(decode(&encoded).unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
    }

    #[tokio::test]
    async fn fails_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("removed.bin");

        let result = encode(&FileSource::Path(path.clone())).await;

        match result {
            Err(EncodingError::Io { path: failed, .. }) => {
                assert_eq!(failed, path)
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
