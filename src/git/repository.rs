use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Commit, Cred, CredentialType, ErrorCode, FetchOptions, IndexAddOption, Oid,
    PushOptions, RemoteCallbacks, Repository as Git2Repo, RepositoryInitOptions, Sort,
    StashFlags, StatusOptions,
};
use tracing::debug;

use crate::domain::SemanticVersion;
use crate::error::{PublishError, Result};

const MAX_CREDENTIAL_ATTEMPTS: u32 = 4;

/// Wrapper around git2::Repository with our trait interface
///
/// The wrapped repository is absent until one is discovered at, or
/// initialized in, the working path.
pub struct Git2Repository {
    path: PathBuf,
    repo: Option<Git2Repo>,
}

impl Git2Repository {
    /// Discover the repository containing `path`, if there is one
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let repo = match Git2Repo::discover(&path) {
            Ok(repo) => Some(repo),
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Git2Repository { path, repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Git2Repository {
            path,
            repo: Some(repo),
        }
    }

    fn repo(&self) -> Result<&Git2Repo> {
        self.repo.as_ref().ok_or_else(|| {
            PublishError::repository_init(format!(
                "No git repository at '{}'",
                self.path.display()
            ))
        })
    }

    fn repo_mut(&mut self) -> Result<&mut Git2Repo> {
        let path = &self.path;
        self.repo.as_mut().ok_or_else(|| {
            PublishError::repository_init(format!("No git repository at '{}'", path.display()))
        })
    }

    fn fetch_refspecs(&self, remote_name: &str, refspecs: &[&str]) -> Result<()> {
        let repo = self.repo()?;
        let mut remote = repo.find_remote(remote_name).map_err(|e| {
            PublishError::remote(format!("Remote '{}' not found: {}", remote_name, e))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks(repo.config().ok()));

        debug!(remote = remote_name, ?refspecs, "fetching");
        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                PublishError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut remote = repo.find_remote(remote_name).map_err(|e| {
            PublishError::remote(format!("Remote '{}' not found: {}", remote_name, e))
        })?;

        let mut callbacks = remote_callbacks(repo.config().ok());
        // A rejected ref is reported here, not as an error from push()
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, message
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        debug!(remote = remote_name, refspec, "pushing");
        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    PublishError::remote(format!("Network error during push: {}", e))
                } else {
                    PublishError::remote(format!(
                        "Push of '{}' to '{}' failed: {}",
                        refspec, remote_name, e
                    ))
                }
            })
    }

    /// Fast-forward `branch` to `<remote>/<branch>`, updating the working tree
    /// when the branch is checked out. Equivalent to `git merge --ff-only`.
    fn fast_forward(&self, remote_name: &str, branch: &str) -> Result<()> {
        let repo = self.repo()?;
        let tracking = format!("refs/remotes/{}/{}", remote_name, branch);

        let remote_oid = match repo.find_reference(&tracking) {
            Ok(reference) => reference.target().ok_or_else(|| {
                PublishError::branch_sync(format!("Reference {} is invalid", tracking))
            })?,
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(%tracking, "no remote counterpart, nothing to pull");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let local_name = format!("refs/heads/{}", branch);
        let mut local_ref = match repo.find_reference(&local_name) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => {
                let remote_commit = repo.find_commit(remote_oid)?;
                repo.branch(branch, &remote_commit, false)?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let local_oid = local_ref.target().ok_or_else(|| {
            PublishError::branch_sync(format!("Branch '{}' has no target", branch))
        })?;

        if local_oid == remote_oid || repo.graph_descendant_of(local_oid, remote_oid)? {
            return Ok(());
        }

        if !repo.graph_descendant_of(remote_oid, local_oid)? {
            return Err(PublishError::branch_sync(format!(
                "Branch '{}' has diverged from {}, cannot fast-forward",
                branch, tracking
            )));
        }

        local_ref.set_target(remote_oid, &format!("fast-forward from {}", tracking))?;

        let checked_out = repo
            .head()
            .map(|head| head.name() == Some(local_name.as_str()))
            .unwrap_or(false);
        if checked_out {
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        }

        debug!(branch, from = %local_oid, to = %remote_oid, "fast-forwarded");
        Ok(())
    }
}

fn head_commit(repo: &Git2Repo) -> std::result::Result<Option<Commit<'_>>, git2::Error> {
    match repo.head() {
        Ok(head) => head.peel_to_commit().map(Some),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

fn highest_version(names: &[String], prefix: &str) -> Option<String> {
    names
        .iter()
        .max_by_key(|name| SemanticVersion::parse_tag(name, prefix).ok())
        .cloned()
}

/// Credential lookup for fetch and push.
///
/// Tries SSH keys from ~/.ssh, then the SSH agent, then git credential
/// helpers, then default credentials.
fn remote_callbacks<'a>(config: Option<git2::Config>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(config) = &config {
                if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }

        Cred::default()
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn is_initialized(&self) -> bool {
        self.repo.is_some()
    }

    fn init(&mut self, initial_branch: &str) -> Result<()> {
        let mut options = RepositoryInitOptions::new();
        options.initial_head(initial_branch);

        let repo = Git2Repo::init_opts(&self.path, &options)?;
        debug!(path = %self.path.display(), initial_branch, "initialized repository");
        self.repo = Some(repo);
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        match self.repo()?.find_remote(remote) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn add_remote(&mut self, remote: &str, url: &str) -> Result<()> {
        self.repo()?.remote(remote, url)?;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo()?.find_reference("HEAD")?;

        match head.symbolic_target() {
            Some(target) => Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string()),
            None => Err(PublishError::branch_sync(
                "HEAD is detached, check out a branch first",
            )),
        }
    }

    fn head_is_unborn(&self) -> Result<bool> {
        Ok(head_commit(self.repo()?)?.is_none())
    }

    fn is_working_tree_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo()?.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn head_commit_message(&self) -> Result<Option<String>> {
        let commit = head_commit(self.repo()?)?;
        Ok(commit.and_then(|c| c.message().map(str::to_string)))
    }

    fn fetch(&mut self, remote: &str) -> Result<()> {
        let heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        self.fetch_refspecs(remote, &[heads.as_str(), "+refs/tags/*:refs/tags/*"])
    }

    fn fetch_tags(&mut self, remote: &str) -> Result<()> {
        self.fetch_refspecs(remote, &["+refs/tags/*:refs/tags/*"])
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool> {
        let name = format!("refs/remotes/{}/{}", remote, branch);
        match self.repo()?.find_reference(&name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        let repo = self.repo()?;
        let refname = format!("refs/heads/{}", branch);

        let target = repo.revparse_single(&refname)?;
        repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
        repo.set_head(&refname)?;
        Ok(())
    }

    fn pull(&mut self, remote: &str, branch: &str) -> Result<()> {
        let heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        self.fetch_refspecs(remote, &[heads.as_str()])?;
        self.fast_forward(remote, branch)
    }

    fn stash_save(&mut self, message: &str) -> Result<()> {
        let repo = self.repo_mut()?;
        let signature = repo.signature()?;
        repo.stash_save(&signature, message, Some(StashFlags::INCLUDE_UNTRACKED))?;
        Ok(())
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.repo_mut()?.stash_pop(0, None)?;
        Ok(())
    }

    fn commit_all(&mut self, message: &str) -> Result<()> {
        let repo = self.repo()?;

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = repo.signature()?;
        let parent = head_commit(repo)?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(%oid, "committed");
        Ok(())
    }

    fn latest_tag(&self, branch: &str, prefix: &str) -> Result<Option<String>> {
        let repo = self.repo()?;

        let start = match repo.find_branch(branch, BranchType::Local) {
            Ok(local) => local.get().target(),
            Err(e) if e.code() == ErrorCode::NotFound => head_commit(repo)?.map(|c| c.id()),
            Err(e) => return Err(e.into()),
        };
        let Some(start) = start else {
            return Ok(None);
        };

        // Annotated and lightweight tags both peel to the tagged commit
        let mut tags_by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        for name in repo.tag_names(None)?.iter().flatten() {
            if let Ok(reference) = repo.find_reference(&format!("refs/tags/{}", name)) {
                if let Ok(commit) = reference.peel_to_commit() {
                    tags_by_commit
                        .entry(commit.id())
                        .or_default()
                        .push(name.to_string());
                }
            }
        }

        if tags_by_commit.is_empty() {
            return Ok(None);
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start)?;

        for oid in revwalk {
            if let Some(names) = tags_by_commit.get(&oid?) {
                return Ok(highest_version(names, prefix));
            }
        }

        Ok(None)
    }

    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        match self
            .repo()?
            .find_reference(&format!("refs/tags/{}", tag_name))
        {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_annotated_tag(&mut self, name: &str, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let head = head_commit(repo)?
            .ok_or_else(|| PublishError::tag_creation("HEAD has no commit to tag"))?;
        let signature = repo.signature()?;

        repo.tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn push_branch(&mut self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.push_refspec(remote, &format!("refs/heads/{0}:refs/heads/{0}", branch))?;

        if set_upstream {
            let mut config = self.repo()?.config()?;
            config.set_str(&format!("branch.{}.remote", branch), remote)?;
            config.set_str(
                &format!("branch.{}.merge", branch),
                &format!("refs/heads/{}", branch),
            )?;
        }
        Ok(())
    }

    fn push_tag(&mut self, remote: &str, tag_name: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/tags/{0}:refs/tags/{0}", tag_name))
    }
}
