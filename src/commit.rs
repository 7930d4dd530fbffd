//! Multi-file commits over the git data API.
//!
//! One commit is assembled from N file changes by resolving the branch tip,
//! uploading one blob per file, creating a tree on top of the tip's tree,
//! creating a single parent commit and finally moving the branch to it.
//!
//! The sequence is not transactional. When a later step fails (or the
//! surrounding future is dropped) the blobs, tree and commit created so far
//! stay behind on the remote as unreferenced objects until the host garbage
//! collects them. No cleanup is attempted because the API offers no way to
//! delete git objects.
use derive_builder::Builder;
use futures_util::{StreamExt, TryStreamExt, stream};
use log::*;
use std::collections::HashSet;

use crate::{
    encoding,
    error::CommitError,
    forge::{
        request::{
            CommitResult, CreateBlobRequest, CreateCommitRequest,
            CreateTreeRequest, FileChange, TreeEntry, UpdateRefRequest,
        },
        traits::GitDataApi,
    },
    session::RepositoryRef,
};

/// Default number of blob uploads kept in flight.
pub const DEFAULT_BLOB_CONCURRENCY: usize = 4;

/// Knobs the caller controls for every commit.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct CommitOptions {
    /// Move the branch even when it no longer points at the parent read in
    /// the first step. Any commit that landed in between is discarded.
    pub force: bool,
    /// Maximum number of concurrent blob uploads (at least one).
    pub blob_concurrency: usize,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            force: false,
            blob_concurrency: DEFAULT_BLOB_CONCURRENCY,
        }
    }
}

/// Everything describing one commit to publish.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct MultiFileCommit {
    pub repo: RepositoryRef,
    pub branch: String,
    pub message: String,
    pub files: Vec<FileChange>,
}

impl CommitOptions {
    pub fn builder() -> CommitOptionsBuilder {
        CommitOptionsBuilder::default()
    }
}

impl MultiFileCommit {
    pub fn builder() -> MultiFileCommitBuilder {
        MultiFileCommitBuilder::default()
    }
}

/// Turns [`MultiFileCommit`] requests into commits on the remote.
pub struct CommitBuilder<'a> {
    api: &'a dyn GitDataApi,
    options: CommitOptions,
}

impl<'a> CommitBuilder<'a> {
    pub fn new(api: &'a dyn GitDataApi, options: CommitOptions) -> Self {
        Self { api, options }
    }

    pub fn options(&self) -> &CommitOptions {
        &self.options
    }

    /// Publish all file changes of `req` as one commit on `req.branch`.
    ///
    /// Paths are validated and every file is encoded before the first
    /// request is sent, so caller mistakes never reach the network.
    pub async fn build_multi_file_commit(
        &self,
        req: &MultiFileCommit,
    ) -> Result<CommitResult, CommitError> {
        let paths = validate_changes(&req.files)?;
        let encoded = encode_changes(paths, &req.files).await?;

        let parent_sha = self.resolve_branch_tip(&req.repo, &req.branch).await?;

        let entries = self.create_blobs(&req.repo, encoded).await?;

        let tree = self
            .api
            .create_tree(
                &req.repo,
                CreateTreeRequest {
                    base_tree: parent_sha.clone(),
                    tree: entries,
                },
            )
            .await
            .map_err(CommitError::TreeCreation)?;

        info!("created new tree: {}", tree.sha);

        let commit = self
            .api
            .create_commit(
                &req.repo,
                CreateCommitRequest::new(&req.message, &tree.sha, &parent_sha),
            )
            .await
            .map_err(CommitError::CommitCreation)?;

        info!("created commit: {} (parent {parent_sha})", commit.sha);

        self.advance_branch(&req.repo, &req.branch, &parent_sha, &commit.sha)
            .await?;

        Ok(CommitResult {
            commit_sha: commit.sha,
            tree_sha: tree.sha,
            parent_sha,
        })
    }

    async fn resolve_branch_tip(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> Result<String, CommitError> {
        debug!("resolving tip of {repo}@{branch}");

        match self.api.get_branch_ref(repo, branch).await {
            Ok(branch_ref) => {
                info!("branch {branch} is at {}", branch_ref.target_sha);
                Ok(branch_ref.target_sha)
            }
            Err(err) if err.is_not_found() => {
                error!("branch {branch} does not exist in {repo}");
                Err(CommitError::RefNotFound {
                    branch: branch.to_string(),
                })
            }
            Err(source) => Err(CommitError::RefLookup {
                branch: branch.to_string(),
                source,
            }),
        }
    }

    /// Upload blobs with bounded concurrency. Entries come back in input
    /// order and the first failure in input order is reported.
    async fn create_blobs(
        &self,
        repo: &RepositoryRef,
        encoded: Vec<(String, String)>,
    ) -> Result<Vec<TreeEntry>, CommitError> {
        let concurrency = self.options.blob_concurrency.max(1);

        stream::iter(encoded)
            .map(|(path, content)| async move {
                let blob = self
                    .api
                    .create_blob(repo, CreateBlobRequest::base64(content))
                    .await
                    .map_err(|source| CommitError::BlobCreation {
                        path: path.clone(),
                        source,
                    })?;

                debug!("created blob {} for {path}", blob.sha);

                Ok::<_, CommitError>(TreeEntry::blob(path, blob.sha))
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }

    async fn advance_branch(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        parent_sha: &str,
        commit_sha: &str,
    ) -> Result<(), CommitError> {
        let force = self.options.force;

        if force {
            warn!(
                "force updating {branch}: commits made after {parent_sha} will be discarded"
            );
        }

        let result = self
            .api
            .update_branch_ref(
                repo,
                branch,
                UpdateRefRequest {
                    sha: commit_sha.to_string(),
                    force,
                },
            )
            .await;

        match result {
            Ok(updated) => {
                info!("branch {} now points at {}", updated.name, updated.target_sha);
                Ok(())
            }
            Err(source) => {
                warn!(
                    "commit {commit_sha} was created but {branch} was not updated: it is left unreferenced"
                );
                if source.is_conflict() && !force {
                    Err(CommitError::RefConflict {
                        branch: branch.to_string(),
                        expected: parent_sha.to_string(),
                        source,
                    })
                } else {
                    Err(CommitError::RefUpdate {
                        branch: branch.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

/// Normalize a repository relative path, rejecting anything git trees
/// cannot hold.
pub fn normalize_path(path: &str) -> Result<String, CommitError> {
    let invalid = |reason: &str| CommitError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let normalized = path.strip_prefix("./").unwrap_or(path);

    if normalized.is_empty() {
        return Err(invalid("path is empty"));
    }

    if normalized.starts_with('/') {
        return Err(invalid("path must be relative to the repository root"));
    }

    if normalized
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("path contains an empty, '.' or '..' segment"));
    }

    Ok(normalized.to_string())
}

fn validate_changes(files: &[FileChange]) -> Result<Vec<String>, CommitError> {
    if files.is_empty() {
        return Err(CommitError::NoChanges);
    }

    let mut seen = HashSet::new();
    let mut paths = Vec::with_capacity(files.len());

    for change in files {
        let path = normalize_path(&change.path)?;
        if !seen.insert(path.clone()) {
            return Err(CommitError::DuplicatePath(path));
        }
        paths.push(path);
    }

    Ok(paths)
}

async fn encode_changes(
    paths: Vec<String>,
    files: &[FileChange],
) -> Result<Vec<(String, String)>, CommitError> {
    let mut encoded = Vec::with_capacity(files.len());

    for (path, change) in paths.into_iter().zip(files) {
        let content = encoding::encode(&change.source).await.map_err(
            |source| CommitError::Encoding {
                path: path.clone(),
                source,
            },
        )?;
        encoded.push((path, content));
    }

    Ok(encoded)
}
