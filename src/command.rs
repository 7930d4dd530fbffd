//! Subcommands of the `multicommit` binary.
//!
//! Each command receives the [`GitDataApi`](crate::forge::traits::GitDataApi)
//! client and the repository it targets explicitly, so the same code runs
//! against GitHub in the binary and against a mock in tests.

/// Publish local files as one commit on a branch.
pub mod commit;

/// Print a file or a directory listing from the repository.
pub mod show;
