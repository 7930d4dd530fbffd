//! Error types for the git data API collaborator, the blob encoder and the
//! multi-file commit builder.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`GitDataApi`](crate::forge::traits::GitDataApi)
/// implementation.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("resource not found: {0}")]
    NotFound(String),

    /// HTTP 409 or 422. For a ref update this means the branch is no longer
    /// at the expected parent.
    #[error("request rejected by remote: {0}")]
    Conflict(String),

    #[error("API authentication failed: {0}")]
    Authentication(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network request failed: {0}")]
    Network(String),

    #[error("unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid API url: {0}")]
    InvalidUrl(String),
}

/// Result type alias for collaborator calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Classify an HTTP status and message returned by the remote.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Conflict(message)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                if message.to_lowercase().contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            _ => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ApiError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status =
                    StatusCode::from_u16(source.status_code.as_u16())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Self::from_status(status, source.message.clone())
            }
            octocrab::Error::Serde { source, .. } => {
                Self::UnexpectedResponse(source.to_string())
            }
            octocrab::Error::Json { source, .. } => {
                Self::UnexpectedResponse(source.to_string())
            }
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::UnexpectedResponse(err.to_string())
    }
}

/// Failure while turning a file source into a base64 blob payload.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Phase of the multi-file commit sequence an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Validate,
    Encode,
    ResolveRef,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

/// Errors surfaced by [`CommitBuilder`](crate::commit::CommitBuilder).
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("no file changes provided")]
    NoChanges,

    #[error("invalid file path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("duplicate path in change set: {0}")]
    DuplicatePath(String),

    #[error("failed to encode {path}: {source}")]
    Encoding {
        path: String,
        #[source]
        source: EncodingError,
    },

    #[error("branch not found: {branch}")]
    RefNotFound { branch: String },

    #[error("failed to resolve branch {branch}: {source}")]
    RefLookup {
        branch: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to create blob for {path}: {source}")]
    BlobCreation {
        path: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to create tree: {0}")]
    TreeCreation(#[source] ApiError),

    #[error("failed to create commit: {0}")]
    CommitCreation(#[source] ApiError),

    #[error(
        "branch {branch} no longer points at {expected}: another commit landed first"
    )]
    RefConflict {
        branch: String,
        expected: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to update branch {branch}: {source}")]
    RefUpdate {
        branch: String,
        #[source]
        source: ApiError,
    },
}

impl CommitError {
    /// The step of the commit sequence that failed.
    pub fn step(&self) -> Step {
        match self {
            Self::NoChanges
            | Self::InvalidPath { .. }
            | Self::DuplicatePath(_) => Step::Validate,
            Self::Encoding { .. } => Step::Encode,
            Self::RefNotFound { .. } | Self::RefLookup { .. } => {
                Step::ResolveRef
            }
            Self::BlobCreation { .. } => Step::CreateBlob,
            Self::TreeCreation(_) => Step::CreateTree,
            Self::CommitCreation(_) => Step::CreateCommit,
            Self::RefConflict { .. } | Self::RefUpdate { .. } => {
                Step::UpdateRef
            }
        }
    }

    /// True when the branch moved underneath a non-forced update. The whole
    /// sequence can be rerun from the ref lookup.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RefConflict { .. })
    }

    /// The underlying transport error, if the failure came from the remote.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::RefLookup { source, .. }
            | Self::BlobCreation { source, .. }
            | Self::RefConflict { source, .. }
            | Self::RefUpdate { source, .. }
            | Self::TreeCreation(source)
            | Self::CommitCreation(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "").is_not_found());
        assert!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "")
                .is_conflict()
        );
        assert!(ApiError::from_status(StatusCode::CONFLICT, "").is_conflict());
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "Bad credentials"),
            ApiError::Authentication(_)
        ));
        assert!(matches!(
            ApiError::from_status(
                StatusCode::FORBIDDEN,
                "API rate limit exceeded for user"
            ),
            ApiError::RateLimitExceeded
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "oops"),
            ApiError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn reports_failing_step() {
        let err = CommitError::BlobCreation {
            path: "a.txt".into(),
            source: ApiError::Network("reset".into()),
        };
        assert_eq!(err.step(), Step::CreateBlob);
        assert_eq!(err.step().to_string(), "create_blob");
        assert!(err.api_error().is_some());
        assert!(!err.is_conflict());

        let err = CommitError::DuplicatePath("a.txt".into());
        assert_eq!(err.step(), Step::Validate);
        assert!(err.api_error().is_none());
    }
}
