//! Publish several file changes to a GitHub branch as one commit.
pub mod cli;
pub mod command;
pub mod commit;
pub mod config;
pub mod encoding;
pub mod error;
pub mod forge;
pub mod result;
pub mod session;

pub use commit::{CommitBuilder, CommitOptions, MultiFileCommit};
pub use error::{ApiError, CommitError, Step};
pub use forge::{
    github::Github,
    request::{CommitResult, FileChange},
    traits::GitDataApi,
};
pub use result::Result;
pub use session::{Credential, RepoContext, RepositoryRef};
