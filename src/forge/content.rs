//! Repository content as returned by the contents API, decoded once into a
//! tagged type.
//!
//! The endpoint answers with a JSON array for directories, an object with
//! base64 `content` for files, an object without content for symlinks and
//! submodules, or a bare string when raw content was requested.
use serde::Deserialize;
use serde_json::Value;
use strum::Display;

use crate::{
    encoding,
    error::{ApiError, ApiResult, EncodingError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Single file whose content is still base64 encoded.
pub struct EncodedFile {
    pub path: String,
    pub sha: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoContent {
    /// Plain file content delivered without an encoding wrapper.
    Raw(String),
    /// File content wrapped in base64.
    Encoded(EncodedFile),
    /// Listing of a directory (or a lone non-file entry).
    Directory(Vec<DirectoryEntry>),
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    path: String,
    sha: String,
    #[serde(default)]
    encoding: Option<String>,
    content: String,
}

impl RepoContent {
    /// Decode a contents API response body.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        match value {
            Value::String(raw) => Ok(Self::Raw(raw)),
            Value::Array(_) => {
                let entries: Vec<DirectoryEntry> =
                    serde_json::from_value(value)?;
                Ok(Self::Directory(entries))
            }
            Value::Object(object) if object.contains_key("content") => {
                let file: FileResponse =
                    serde_json::from_value(Value::Object(object))?;
                match file.encoding.as_deref() {
                    Some("base64") => Ok(Self::Encoded(EncodedFile {
                        path: file.path,
                        sha: file.sha,
                        content: file.content,
                    })),
                    Some("none") => Err(ApiError::UnexpectedResponse(format!(
                        "{} is too large to be returned by the contents API",
                        file.path
                    ))),
                    _ => Ok(Self::Raw(file.content)),
                }
            }
            Value::Object(object) => {
                let entry: DirectoryEntry =
                    serde_json::from_value(Value::Object(object))?;
                Ok(Self::Directory(vec![entry]))
            }
            other => Err(ApiError::UnexpectedResponse(format!(
                "unsupported contents response: {other}"
            ))),
        }
    }

    /// File bytes, or `None` for directory listings.
    pub fn bytes(&self) -> Result<Option<Vec<u8>>, EncodingError> {
        match self {
            Self::Raw(raw) => Ok(Some(raw.as_bytes().to_vec())),
            Self::Encoded(file) => Ok(Some(encoding::decode(&file.content)?)),
            Self::Directory(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_base64_file() {
        let content = RepoContent::from_value(json!({
            "type": "file",
            "encoding": "base64",
            "size": 5,
            "name": "a.txt",
            "path": "docs/a.txt",
            "sha": "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0",
            "content": "aGVs\nbG8=\n",
        }))
        .unwrap();

        match &content {
            RepoContent::Encoded(file) => {
                assert_eq!(file.path, "docs/a.txt");
                assert_eq!(file.sha, "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
            }
            other => panic!("expected encoded file, got {other:?}"),
        }
        assert_eq!(content.bytes().unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn decodes_directory_listing() {
        let content = RepoContent::from_value(json!([
            { "type": "file", "name": "README.md", "path": "README.md", "sha": "1", "size": 10 },
            { "type": "dir", "name": "src", "path": "src", "sha": "2", "size": 0 },
        ]))
        .unwrap();

        match &content {
            RepoContent::Directory(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].kind, EntryKind::File);
                assert_eq!(entries[1].kind, EntryKind::Dir);
                assert_eq!(entries[1].path, "src");
            }
            other => panic!("expected directory, got {other:?}"),
        }
        assert_eq!(content.bytes().unwrap(), None);
    }

    #[test]
    fn decodes_raw_string() {
        let content = RepoContent::from_value(json!("plain text")).unwrap();
        assert_eq!(content, RepoContent::Raw("plain text".into()));
        assert_eq!(content.bytes().unwrap(), Some(b"plain text".to_vec()));
    }

    #[test]
    fn wraps_lone_symlink_as_directory() {
        let content = RepoContent::from_value(json!({
            "type": "symlink",
            "target": "../lib",
            "name": "lib",
            "path": "vendor/lib",
            "sha": "3",
            "size": 6,
        }))
        .unwrap();

        match content {
            RepoContent::Directory(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].kind, EntryKind::Symlink);
            }
            other => panic!("expected directory, got {other:?}"),
        }
    }

    #[test]
    fn rejects_files_without_inline_content() {
        let result = RepoContent::from_value(json!({
            "type": "file",
            "encoding": "none",
            "name": "big.bin",
            "path": "big.bin",
            "sha": "4",
            "content": "",
        }));
        assert!(matches!(result, Err(ApiError::UnexpectedResponse(_))));
    }

    #[test]
    fn rejects_scalar_responses() {
        assert!(RepoContent::from_value(json!(42)).is_err());
    }
}
