//! Credential and repository context passed explicitly to every operation.
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, str::FromStr};

/// Personal access token plus the (optional) login it belongs to.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: SecretString,
    pub username: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            username,
        }
    }

    pub(crate) fn token(&self) -> String {
        self.token.expose_secret().to_string()
    }
}

/// A repository on the remote, identified by `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    /// Filled in once the repository metadata has been fetched.
    pub default_branch: Option<String>,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            default_branch: None,
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = String;

    fn from_str(full_name: &str) -> Result<Self, Self::Err> {
        let full_name = full_name.trim().trim_end_matches(".git");
        let mut parts = full_name.split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None)
                if !owner.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(format!(
                "expected repository in owner/repo form, got: {full_name}"
            )),
        }
    }
}

/// Everything an operation needs to know about who is calling and which
/// repository it targets. Constructed by the caller and handed to each
/// operation rather than kept in global state.
#[derive(Debug, Clone)]
pub struct RepoContext {
    pub credential: Credential,
    pub repository: RepositoryRef,
    /// API root, e.g. `https://api.github.com`.
    pub api_url: String,
}
