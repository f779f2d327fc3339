//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! queries sqlbundle needs, allowing for a real libgit2-backed
//! implementation and an in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! History is treated as a chain of first parents. Whether a merge inside a
//! range is acceptable is decided by the range resolver, not here.
//!
//! ```rust
//! # use sqlbundle::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> sqlbundle::Result<()> {
//! let head = repo.head_commit()?;
//! let history = repo.get_commits_between(None, &head)?;
//! for commit in &history {
//!     let changes = repo.get_changes_in(commit)?;
//!     println!("{}: {} change(s)", commit, changes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{Edit, MockRepository};
pub use repository::Git2Repository;

use crate::domain::{CommitRef, FileChange};
use crate::error::Result;

/// Repository access consumed by the range resolver and bundle assembler
///
/// ## Error Handling
///
/// - Unknown tokens fail with [crate::error::BundleError::RefNotFound].
/// - Paths absent at a commit fail with
///   [crate::error::BundleError::ContentMissing].
/// - Backend failures map to [crate::error::BundleError::Git].
pub trait Repository {
    /// Resolve a token (full or abbreviated id, branch, tag, `HEAD`) to a commit
    fn resolve_commit(&self, token: &str) -> Result<CommitRef>;

    /// Commit at the tip of the currently checked-out branch
    fn head_commit(&self) -> Result<CommitRef>;

    /// Commits after `from` (exclusive) up to `to` (inclusive), oldest first.
    ///
    /// Walks first parents back from `to`. When `from` is `None`, or is never
    /// met, the walk runs to the root commit and includes it.
    fn get_commits_between(&self, from: Option<&CommitRef>, to: &CommitRef)
        -> Result<Vec<CommitRef>>;

    /// Paths touched by a commit relative to its first parent (or the empty
    /// tree for a root commit)
    fn get_changes_in(&self, commit: &CommitRef) -> Result<Vec<FileChange>>;

    /// Raw bytes of a file as of a commit
    fn read_file_at(&self, path: &str, commit: &CommitRef) -> Result<Vec<u8>>;
}
