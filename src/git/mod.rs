//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only git
//! queries helm-release needs, allowing for a real implementation backed by
//! libgit2 and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory linear history for tests
//!
//! # Usage
//!
//! ```no_run
//! # use helm_release::git::{Git2Repository, Repository};
//! # fn example() -> helm_release::Result<()> {
//! let repo = Git2Repository::open("charts/demo")?;
//! if let Some(head) = repo.head_oid()? {
//!     for commit in repo.commits_between(None, head)? {
//!         println!("{}: {}", commit.hash, commit.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
}

/// Read-only git queries used to inspect release history
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` into [crate::error::HelmReleaseError::Git].
pub trait Repository {
    /// Commit HEAD points at, or `None` for a repository without commits
    fn head_oid(&self) -> Result<Option<Oid>>;

    /// Name of the checked out branch, or `None` when HEAD is detached or unborn
    fn current_branch(&self) -> Result<Option<String>>;

    /// All tags with the commit each one peels to
    ///
    /// Tags pointing at non-commit objects are left out.
    fn tags(&self) -> Result<Vec<(String, Oid)>>;

    /// Commits reachable from `head`, nearest first
    fn ancestors(&self, head: Oid) -> Result<Vec<Oid>>;

    /// Commits reachable from `to_oid` but not from `from_oid`
    ///
    /// Returns commits in chronological order (oldest first). With no
    /// `from_oid`, returns every commit reachable from `to_oid`.
    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>>;

    /// Whether tracked files differ from HEAD (untracked files are ignored)
    fn is_dirty(&self) -> Result<bool>;
}
