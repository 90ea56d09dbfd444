use std::collections::{BTreeSet, HashMap};

use crate::error::{PublishError, Result};
use crate::git::Repository;

/// In-memory repository for testing without actual git operations
///
/// Models one working copy plus one remote: local and remote tags, remote
/// branches, a dirty flag for the working tree and a stash stack. Every
/// mutating call is appended to [MockRepository::operations] so tests can
/// assert on the exact sequence.
#[derive(Debug, Clone)]
pub struct MockRepository {
    initialized: bool,
    remotes: HashMap<String, String>,
    branch: String,
    unborn: bool,
    dirty: bool,
    stash: Vec<bool>,
    head_message: Option<String>,
    latest_tags: HashMap<String, String>,
    local_tags: BTreeSet<String>,
    remote_tags: BTreeSet<String>,
    remote_branches: BTreeSet<String>,
    late_remote_tags: Vec<String>,
    branch_push_failures: u32,
    tag_push_failures: u32,
    pull_error: Option<String>,
    stash_pop_error: Option<String>,
    tag_error: Option<String>,
    operations: Vec<String>,
}

impl MockRepository {
    /// Create an initialized repository on `branch` with an `origin` remote
    pub fn new(branch: impl Into<String>) -> Self {
        let mut remotes = HashMap::new();
        remotes.insert("origin".to_string(), "git@example.com:acme/app.git".to_string());

        MockRepository {
            initialized: true,
            remotes,
            branch: branch.into(),
            unborn: false,
            dirty: false,
            stash: Vec::new(),
            head_message: None,
            latest_tags: HashMap::new(),
            local_tags: BTreeSet::new(),
            remote_tags: BTreeSet::new(),
            remote_branches: BTreeSet::new(),
            late_remote_tags: Vec::new(),
            branch_push_failures: 0,
            tag_push_failures: 0,
            pull_error: None,
            stash_pop_error: None,
            tag_error: None,
            operations: Vec::new(),
        }
    }

    /// A directory with no repository and no remotes
    pub fn uninitialized() -> Self {
        let mut repo = MockRepository::new("main");
        repo.initialized = false;
        repo.remotes.clear();
        repo.unborn = true;
        repo
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn set_head_message(&mut self, message: impl Into<String>) {
        self.head_message = Some(message.into());
    }

    /// Latest tag reachable from `branch`; the tag also exists locally and remotely
    pub fn set_latest_tag(&mut self, branch: impl Into<String>, tag: impl Into<String>) {
        let tag = tag.into();
        self.local_tags.insert(tag.clone());
        self.remote_tags.insert(tag.clone());
        self.latest_tags.insert(branch.into(), tag);
    }

    /// A tag that only exists on the remote until the next fetch
    pub fn add_remote_tag(&mut self, tag: impl Into<String>) {
        self.remote_tags.insert(tag.into());
    }

    /// A tag someone else pushes right after the first full fetch, so only a
    /// later tag fetch sees it
    pub fn add_late_remote_tag(&mut self, tag: impl Into<String>) {
        self.late_remote_tags.push(tag.into());
    }

    pub fn add_remote_branch(&mut self, branch: impl Into<String>) {
        self.remote_branches.insert(branch.into());
    }

    /// Make the next `count` branch pushes fail
    pub fn fail_branch_pushes(&mut self, count: u32) {
        self.branch_push_failures = count;
    }

    /// Make the next `count` tag pushes fail
    pub fn fail_tag_pushes(&mut self, count: u32) {
        self.tag_push_failures = count;
    }

    pub fn fail_pull(&mut self, message: impl Into<String>) {
        self.pull_error = Some(message.into());
    }

    pub fn fail_stash_pop(&mut self, message: impl Into<String>) {
        self.stash_pop_error = Some(message.into());
    }

    pub fn fail_tagging(&mut self, message: impl Into<String>) {
        self.tag_error = Some(message.into());
    }

    /// Mutating calls in the order they were made
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn stash_depth(&self) -> usize {
        self.stash.len()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn remote_url(&self, remote: &str) -> Option<&str> {
        self.remotes.get(remote).map(String::as_str)
    }

    pub fn has_remote_tag(&self, tag: &str) -> bool {
        self.remote_tags.contains(tag)
    }

    pub fn has_remote_branch(&self, branch: &str) -> bool {
        self.remote_branches.contains(branch)
    }

    fn record(&mut self, operation: String) {
        self.operations.push(operation);
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(PublishError::repository_init("not a git repository"))
        }
    }

    fn ensure_remote(&self, remote: &str) -> Result<()> {
        if self.remotes.contains_key(remote) {
            Ok(())
        } else {
            Err(PublishError::remote(format!("Remote '{}' not found", remote)))
        }
    }
}

fn take_push_failure(remaining: &mut u32, what: &str) -> Result<()> {
    if *remaining > 0 {
        *remaining -= 1;
        return Err(PublishError::remote(format!(
            "connection reset while pushing {}",
            what
        )));
    }
    Ok(())
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("main")
    }
}

impl Repository for MockRepository {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn init(&mut self, initial_branch: &str) -> Result<()> {
        self.record(format!("init {}", initial_branch));
        self.initialized = true;
        self.unborn = true;
        self.branch = initial_branch.to_string();
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        self.ensure_initialized()?;
        Ok(self.remotes.contains_key(remote))
    }

    fn add_remote(&mut self, remote: &str, url: &str) -> Result<()> {
        self.ensure_initialized()?;
        self.record(format!("remote add {} {}", remote, url));
        self.remotes.insert(remote.to_string(), url.to_string());
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.ensure_initialized()?;
        Ok(self.branch.clone())
    }

    fn head_is_unborn(&self) -> Result<bool> {
        Ok(self.unborn)
    }

    fn is_working_tree_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn head_commit_message(&self) -> Result<Option<String>> {
        Ok(self.head_message.clone())
    }

    fn fetch(&mut self, remote: &str) -> Result<()> {
        self.ensure_remote(remote)?;
        self.record(format!("fetch {}", remote));
        self.local_tags.extend(self.remote_tags.iter().cloned());
        self.remote_tags.extend(self.late_remote_tags.drain(..));
        Ok(())
    }

    fn fetch_tags(&mut self, remote: &str) -> Result<()> {
        self.ensure_remote(remote)?;
        self.record(format!("fetch tags {}", remote));
        self.local_tags.extend(self.remote_tags.iter().cloned());
        Ok(())
    }

    fn remote_branch_exists(&self, _remote: &str, branch: &str) -> Result<bool> {
        Ok(self.remote_branches.contains(branch))
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        if self.dirty {
            return Err(PublishError::remote(format!(
                "local changes would be overwritten by checkout of '{}'",
                branch
            )));
        }
        self.record(format!("checkout {}", branch));
        self.branch = branch.to_string();
        Ok(())
    }

    fn pull(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.ensure_remote(remote)?;
        self.record(format!("pull {} {}", remote, branch));
        if self.dirty {
            return Err(PublishError::remote("cannot pull with uncommitted changes"));
        }
        match &self.pull_error {
            Some(message) => Err(PublishError::remote(message.clone())),
            None => Ok(()),
        }
    }

    fn stash_save(&mut self, _message: &str) -> Result<()> {
        self.record("stash save".to_string());
        self.stash.push(self.dirty);
        self.dirty = false;
        Ok(())
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.record("stash pop".to_string());
        if let Some(message) = &self.stash_pop_error {
            return Err(PublishError::remote(message.clone()));
        }
        let entry = self
            .stash
            .pop()
            .ok_or_else(|| PublishError::remote("no stash entries"))?;
        self.dirty = entry;
        Ok(())
    }

    fn commit_all(&mut self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        self.dirty = false;
        self.unborn = false;
        self.head_message = Some(message.to_string());
        Ok(())
    }

    fn latest_tag(&self, branch: &str, _prefix: &str) -> Result<Option<String>> {
        Ok(self.latest_tags.get(branch).cloned())
    }

    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        Ok(self.local_tags.contains(tag_name))
    }

    fn create_annotated_tag(&mut self, name: &str, message: &str) -> Result<()> {
        if let Some(error) = &self.tag_error {
            return Err(PublishError::remote(error.clone()));
        }
        if self.local_tags.contains(name) {
            return Err(PublishError::remote(format!("tag '{}' already exists", name)));
        }
        self.record(format!("tag {} ({})", name, message));
        self.local_tags.insert(name.to_string());
        Ok(())
    }

    fn push_branch(&mut self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.ensure_remote(remote)?;
        take_push_failure(&mut self.branch_push_failures, branch)?;
        let flag = if set_upstream { " -u" } else { "" };
        self.record(format!("push{} {} {}", flag, remote, branch));
        self.remote_branches.insert(branch.to_string());
        Ok(())
    }

    fn push_tag(&mut self, remote: &str, tag_name: &str) -> Result<()> {
        self.ensure_remote(remote)?;
        take_push_failure(&mut self.tag_push_failures, tag_name)?;
        self.record(format!("push tag {} {}", remote, tag_name));
        self.remote_tags.insert(tag_name.to_string());
        Ok(())
    }
}
