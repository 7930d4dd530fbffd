use serde::{Deserialize, Serialize};

use crate::encoding::FileSource;

/// Regular (non-executable) file mode for tree entries.
pub const TREE_BLOB_MODE: &str = "100644";
/// Tree entry type for file content.
pub const TREE_BLOB_TYPE: &str = "blob";
/// Encoding tag sent with blob content.
pub const BLOB_ENCODING: &str = "base64";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One file to add or replace in a pending commit.
pub struct FileChange {
    /// Relative path to the file starting from repo root
    pub path: String,
    pub source: FileSource,
}

impl FileChange {
    pub fn new(path: impl Into<String>, source: impl Into<FileSource>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Content addressed blob created on the remote.
pub struct Blob {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Body for `POST /repos/{owner}/{repo}/git/blobs`.
pub struct CreateBlobRequest {
    pub content: String,
    pub encoding: String,
}

impl CreateBlobRequest {
    pub fn base64(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: BLOB_ENCODING.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeEntry {
    /// Regular file entry pointing at an existing blob.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: TREE_BLOB_MODE.into(),
            kind: TREE_BLOB_TYPE.into(),
            sha: sha.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Body for `POST /repos/{owner}/{repo}/git/trees`. `base_tree` carries over
/// every file the commit does not touch.
pub struct CreateTreeRequest {
    pub base_tree: String,
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tree {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Body for `POST /repos/{owner}/{repo}/git/commits`.
pub struct CreateCommitRequest {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
}

impl CreateCommitRequest {
    /// Single parent commit, the only shape the builder produces.
    pub fn new(
        message: impl Into<String>,
        tree_sha: impl Into<String>,
        parent_sha: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            tree: tree_sha.into(),
            parents: vec![parent_sha.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Body for `PATCH /repos/{owner}/{repo}/git/refs/heads/{branch}`.
pub struct UpdateRefRequest {
    pub sha: String,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A branch and the commit it points at.
pub struct BranchRef {
    pub name: String,
    pub target_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Identifiers of the objects produced by a successful multi-file commit.
pub struct CommitResult {
    pub commit_sha: String,
    pub tree_sha: String,
    pub parent_sha: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_tree_entry_type_field() {
        let entry = TreeEntry::blob("src/lib.rs", "deadbeef");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "path": "src/lib.rs",
                "mode": "100644",
                "type": "blob",
                "sha": "deadbeef",
            })
        );
    }

    #[test]
    fn builds_single_parent_commit() {
        let req = CreateCommitRequest::new("msg", "tree1", "parent1");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "message": "msg", "tree": "tree1", "parents": ["parent1"] })
        );
    }
}
