//! Traits related to the remote git data API
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    error::ApiResult,
    forge::{
        content::RepoContent,
        request::{
            Blob, BranchRef, Commit, CreateBlobRequest, CreateCommitRequest,
            CreateTreeRequest, Tree, UpdateRefRequest,
        },
    },
    session::RepositoryRef,
};

/// Low level git object and ref operations of a hosted repository.
///
/// Every method is a single request against the remote. Composition into a
/// commit lives in [`CommitBuilder`](crate::commit::CommitBuilder).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitDataApi: Send + Sync {
    /// `GET /repos/{owner}/{repo}`, returning the default branch name.
    async fn get_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> ApiResult<String>;

    /// `GET /repos/{owner}/{repo}/git/ref/heads/{branch}`.
    async fn get_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> ApiResult<BranchRef>;

    /// `POST /repos/{owner}/{repo}/git/blobs`.
    async fn create_blob(
        &self,
        repo: &RepositoryRef,
        req: CreateBlobRequest,
    ) -> ApiResult<Blob>;

    /// `POST /repos/{owner}/{repo}/git/trees`.
    async fn create_tree(
        &self,
        repo: &RepositoryRef,
        req: CreateTreeRequest,
    ) -> ApiResult<Tree>;

    /// `POST /repos/{owner}/{repo}/git/commits`.
    async fn create_commit(
        &self,
        repo: &RepositoryRef,
        req: CreateCommitRequest,
    ) -> ApiResult<Commit>;

    /// `PATCH /repos/{owner}/{repo}/git/refs/heads/{branch}`.
    async fn update_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        req: UpdateRefRequest,
    ) -> ApiResult<BranchRef>;

    /// `GET /repos/{owner}/{repo}/contents/{path}`, optionally at a branch.
    async fn get_content(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: Option<String>,
    ) -> ApiResult<RepoContent>;
}
