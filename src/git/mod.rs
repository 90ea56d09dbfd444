//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! publish sequence needs, allowing for multiple implementations including a
//! real repository and an in-memory one for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Implementations report failures as plain errors; the publish sequencer
//! decides which step failed and wraps them accordingly.
//!
//! ```rust
//! # use git_sync_publish::git::Repository;
//! # fn example<R: Repository>(repo: &mut R) -> git_sync_publish::Result<()> {
//! repo.fetch_tags("origin")?;
//! if !repo.tag_exists("v1.0.0")? {
//!     repo.create_annotated_tag("v1.0.0", "Release v1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// Query methods take `&self`; anything that changes refs, the index, the
/// working tree or the stash takes `&mut self`.
pub trait Repository {
    /// Whether a repository exists at the working location
    fn is_initialized(&self) -> bool;

    /// Create a new repository whose unborn HEAD points at `initial_branch`
    fn init(&mut self, initial_branch: &str) -> Result<()>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, remote: &str) -> Result<bool>;

    /// Configure a new remote
    fn add_remote(&mut self, remote: &str, url: &str) -> Result<()>;

    /// Name of the checked-out branch (also for an unborn HEAD)
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g., "main")
    /// * `Err` - If HEAD is detached or cannot be read
    fn current_branch(&self) -> Result<String>;

    /// True when HEAD has no commit yet
    fn head_is_unborn(&self) -> Result<bool>;

    /// True when there are staged, unstaged or untracked (non-ignored) changes
    fn is_working_tree_dirty(&self) -> Result<bool>;

    /// Full message of the HEAD commit, `None` on an unborn HEAD
    fn head_commit_message(&self) -> Result<Option<String>>;

    /// Fetch all branches and tags from a remote
    fn fetch(&mut self, remote: &str) -> Result<()>;

    /// Fetch only tags from a remote
    fn fetch_tags(&mut self, remote: &str) -> Result<()>;

    /// Whether `refs/remotes/<remote>/<branch>` exists (as of the last fetch)
    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool>;

    /// Switch HEAD and the working tree to a local branch
    fn checkout(&mut self, branch: &str) -> Result<()>;

    /// Fetch `branch` from `remote` and fast-forward the local branch to it
    ///
    /// A missing remote branch is not an error. Diverged history is.
    fn pull(&mut self, remote: &str, branch: &str) -> Result<()>;

    /// Stash all changes including untracked files
    fn stash_save(&mut self, message: &str) -> Result<()>;

    /// Re-apply and drop the most recent stash entry
    fn stash_pop(&mut self) -> Result<()>;

    /// Stage every change (additions, modifications, deletions) and commit
    fn commit_all(&mut self, message: &str) -> Result<()>;

    /// Latest tag reachable from `branch`
    ///
    /// Walks history from the branch tip (or from HEAD when the branch has no
    /// local ref) and returns the first tagged commit's highest-versioned tag.
    /// Versions are read with the tag `prefix` stripped.
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The latest tag name found
    /// * `Ok(None)` - If no tag is reachable or HEAD is unborn
    fn latest_tag(&self, branch: &str, prefix: &str) -> Result<Option<String>>;

    /// Whether a tag with this name exists locally (as of the last fetch)
    fn tag_exists(&self, tag_name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&mut self, name: &str, message: &str) -> Result<()>;

    /// Push a local branch, optionally recording it as the upstream
    fn push_branch(&mut self, remote: &str, branch: &str, set_upstream: bool) -> Result<()>;

    /// Push a single tag
    fn push_tag(&mut self, remote: &str, tag_name: &str) -> Result<()>;
}
