//! Access to the git data API of GitHub and GitHub Enterprise.
//!
//! Request and response payloads live in [`request`] and [`content`], the
//! seam the commit builder talks to is [`traits::GitDataApi`] and the
//! Octocrab backed client is [`github::Github`].

/// Decoded responses of the contents endpoint.
pub mod content;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Payloads for blobs, trees, commits and refs.
pub mod request;

/// Trait abstracting the single requests a commit is built from.
pub mod traits;
