//! Implements the GitDataApi trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use serde_json::Value;
use url::Url;

use crate::{
    error::{ApiError, ApiResult},
    forge::{
        content::RepoContent,
        github::types::{ContentQuery, RefResponse},
        request::{
            Blob, BranchRef, Commit, CreateBlobRequest, CreateCommitRequest,
            CreateTreeRequest, Tree, UpdateRefRequest,
        },
        traits::GitDataApi,
    },
    session::{Credential, RepositoryRef},
};

mod types;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub git data client using Octocrab for authenticated requests.
pub struct Github {
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(credential: &Credential, api_url: &str) -> ApiResult<Self> {
        let base_uri = api_url.trim_end_matches('/').to_string();
        // reject malformed roots before any request is attempted
        Url::parse(&base_uri)?;

        if let Some(username) = &credential.username {
            debug!("authenticating to {base_uri} as {username}");
        }

        let builder = Octocrab::builder()
            .personal_token(credential.token())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self { base_uri, instance })
    }

    /// Absolute endpoint under `/repos/{owner}/{repo}`. Each segment may
    /// itself contain `/` (file paths, branch names), which is kept as a path
    /// separator while everything else is percent encoded.
    fn endpoint(
        &self,
        repo: &RepositoryRef,
        segments: &[&str],
    ) -> ApiResult<String> {
        let mut url = Url::parse(&self.base_uri)?;

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidUrl(format!(
                    "cannot append path to {}",
                    self.base_uri
                ))
            })?;
            path.pop_if_empty()
                .push("repos")
                .push(&repo.owner)
                .push(&repo.name);
            for segment in segments {
                path.extend(segment.split('/').filter(|s| !s.is_empty()));
            }
        }

        Ok(url.to_string())
    }
}

#[async_trait]
impl GitDataApi for Github {
    async fn get_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> ApiResult<String> {
        let repository =
            self.instance.repos(&repo.owner, &repo.name).get().await?;

        repository.default_branch.ok_or_else(|| {
            ApiError::UnexpectedResponse(format!(
                "failed to find default branch for github repo: {repo}"
            ))
        })
    }

    async fn get_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> ApiResult<BranchRef> {
        let endpoint = self.endpoint(repo, &["git/ref/heads", branch])?;

        let response: RefResponse =
            self.instance.get(endpoint, None::<&()>).await?;

        Ok(response.into_branch_ref())
    }

    async fn create_blob(
        &self,
        repo: &RepositoryRef,
        req: CreateBlobRequest,
    ) -> ApiResult<Blob> {
        let endpoint = self.endpoint(repo, &["git/blobs"])?;
        let blob: Blob = self.instance.post(endpoint, Some(&req)).await?;
        Ok(blob)
    }

    async fn create_tree(
        &self,
        repo: &RepositoryRef,
        req: CreateTreeRequest,
    ) -> ApiResult<Tree> {
        let endpoint = self.endpoint(repo, &["git/trees"])?;

        info!("creating tree starting from: {}", req.base_tree);

        let tree: Tree = self.instance.post(endpoint, Some(&req)).await?;

        Ok(tree)
    }

    async fn create_commit(
        &self,
        repo: &RepositoryRef,
        req: CreateCommitRequest,
    ) -> ApiResult<Commit> {
        let endpoint = self.endpoint(repo, &["git/commits"])?;
        let commit: Commit = self.instance.post(endpoint, Some(&req)).await?;
        Ok(commit)
    }

    async fn update_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        req: UpdateRefRequest,
    ) -> ApiResult<BranchRef> {
        let endpoint = self.endpoint(repo, &["git/refs/heads", branch])?;

        let response: RefResponse =
            self.instance.patch(endpoint, Some(&req)).await?;

        Ok(response.into_branch_ref())
    }

    async fn get_content(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: Option<String>,
    ) -> ApiResult<RepoContent> {
        let path = path.strip_prefix("./").unwrap_or(path);
        let endpoint = self.endpoint(repo, &["contents", path])?;
        let query = branch.map(|reference| ContentQuery { reference });

        let value: Value =
            self.instance.get(endpoint, query.as_ref()).await?;

        RepoContent::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> Github {
        Github::new(&Credential::new("token", None), api_url).unwrap()
    }

    #[tokio::test]
    async fn builds_git_data_endpoints() {
        let github = client("https://api.github.com/");
        let repo = RepositoryRef::new("octo", "app");

        assert_eq!(
            github.endpoint(&repo, &["git/ref/heads", "main"]).unwrap(),
            "https://api.github.com/repos/octo/app/git/ref/heads/main"
        );
        assert_eq!(
            github.endpoint(&repo, &["git/blobs"]).unwrap(),
            "https://api.github.com/repos/octo/app/git/blobs"
        );
    }

    #[tokio::test]
    async fn keeps_slashes_in_branch_names() {
        let github = client(DEFAULT_API_URL);
        let repo = RepositoryRef::new("octo", "app");

        assert_eq!(
            github
                .endpoint(&repo, &["git/refs/heads", "feature/login"])
                .unwrap(),
            "https://api.github.com/repos/octo/app/git/refs/heads/feature/login"
        );
    }

    #[tokio::test]
    async fn encodes_content_paths() {
        let github = client("https://ghe.example.com/api/v3");
        let repo = RepositoryRef::new("octo", "app");

        assert_eq!(
            github
                .endpoint(&repo, &["contents", "docs/read me.md"])
                .unwrap(),
            "https://ghe.example.com/api/v3/repos/octo/app/contents/docs/read%20me.md"
        );
    }

    #[test]
    fn rejects_invalid_api_url() {
        let result = Github::new(&Credential::new("token", None), "not a url");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
