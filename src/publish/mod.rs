//! The publish sequence: sync the branch, commit, derive the next version,
//! resolve tag collisions, then tag and push.
//!
//! [PublishSequencer] walks the states in [PublishState] strictly in order.
//! Any failing step moves it to [PublishState::Failed] and the error is
//! returned as-is; remote operations that already succeeded are not undone.

pub mod resolver;
pub mod state;

pub use resolver::{resolve, try_resolve, Resolution, TagCollisionResolver};
pub use state::{FailedStep, PublishState};

use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::decision::DecisionProvider;
use crate::domain::{CommitDecision, PublishContext, SemanticVersion, Tag};
use crate::error::{PublishError, Result};
use crate::git::Repository;
use crate::retry::RetryPolicy;
use crate::ui;

/// Result of a successful publish run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The tag that was created and pushed
    pub tag: String,

    /// The branch the run was started on
    pub branch: String,

    /// Tag the new version was derived from
    pub previous_tag: Option<String>,

    /// Whether pending changes were committed
    pub committed: bool,

    /// Whether the branch was pushed at the end of the run
    pub branch_pushed: bool,

    /// Existing tags skipped while resolving the version
    pub collisions_skipped: u32,
}

/// How a run ended without an error
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published(WorkflowResult),
    /// The user declined to commit; nothing was committed, tagged or pushed
    Cancelled { reason: String },
}

enum Classification {
    Committed(CommitDecision),
    Reused(CommitDecision),
    Declined,
}

/// Drives one publish run against a repository and a decision provider
pub struct PublishSequencer<'a, R: Repository, D: DecisionProvider> {
    repo: &'a mut R,
    decisions: &'a mut D,
    config: &'a Config,
    retry: RetryPolicy,
    state: PublishState,
}

impl<'a, R: Repository, D: DecisionProvider> PublishSequencer<'a, R, D> {
    pub fn new(repo: &'a mut R, decisions: &'a mut D, config: &'a Config) -> Self {
        PublishSequencer {
            repo,
            decisions,
            config,
            retry: config.retry.policy(),
            state: PublishState::Init,
        }
    }

    /// Override the retry policy from the configuration
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Run the whole sequence once
    pub fn run(&mut self) -> Result<PublishOutcome> {
        match self.execute() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let failed = self.state.fail();
                warn!(from = %self.state, error = %e, "publish failed");
                self.state = failed;
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> Result<PublishOutcome> {
        let config = self.config;
        let remote = config.repository.remote.as_str();

        let ctx = self.ensure_branch()?;
        self.advance(PublishState::BranchEnsured);

        let (decision, committed) = match self.classify(&ctx)? {
            Classification::Committed(decision) => (decision, true),
            Classification::Reused(decision) => (decision, false),
            Classification::Declined => {
                info!(branch = %ctx.current_branch, "commit declined");
                return Ok(PublishOutcome::Cancelled {
                    reason: "Commit cancelled by user".to_string(),
                });
            }
        };
        self.advance(PublishState::Classified);

        let (previous_tag, candidate) = self.bump(&decision)?;
        self.advance(PublishState::Bumped);

        let resolution = TagCollisionResolver::new(config.tagging.prefix.as_str())
            .resolve_against(&mut *self.repo, remote, candidate)?;
        let tag = Tag::new(resolution.version, config.tagging.prefix.as_str(), &decision);
        let tag_name = tag.name();
        if resolution.collisions > 0 {
            ui::display_boundary_warning(&BoundaryWarning::TagCollision {
                requested: Tag::new(candidate, config.tagging.prefix.as_str(), &decision).name(),
                resolved: tag_name.clone(),
            });
        }
        self.advance(PublishState::Resolved);

        ui::display_proposed_tag(previous_tag.as_deref(), &tag_name);
        self.repo
            .create_annotated_tag(&tag_name, &tag.annotation)
            .map_err(|e| {
                PublishError::tag_creation(format!("could not create '{}': {}", tag_name, e))
            })?;
        ui::display_success(&format!("Created tag: {}", tag_name));
        self.advance(PublishState::Tagged);

        let mut branch_pushed = false;
        if committed {
            let set_upstream = !self
                .repo
                .remote_branch_exists(remote, &ctx.current_branch)?;
            self.push_branch(&ctx.current_branch, set_upstream)?;
            branch_pushed = true;
        }
        self.push_tag(&tag_name)?;
        self.advance(PublishState::Pushed);

        info!(tag = %tag_name, branch = %ctx.current_branch, committed, "published");
        self.advance(PublishState::Done);

        Ok(PublishOutcome::Published(WorkflowResult {
            tag: tag_name,
            branch: ctx.current_branch,
            previous_tag,
            committed,
            branch_pushed,
            collisions_skipped: resolution.collisions,
        }))
    }

    fn advance(&mut self, next: PublishState) {
        debug!(from = %self.state, to = %next, "transition");
        self.state = next;
    }

    /// Init -> BranchEnsured
    fn ensure_branch(&mut self) -> Result<PublishContext> {
        let config = self.config;
        let primary = config.repository.primary_branch.as_str();
        let remote = config.repository.remote.as_str();

        if !self.repo.is_initialized() {
            ui::display_status("No git repository found, initializing one");
            self.repo
                .init(primary)
                .map_err(|e| PublishError::repository_init(e.to_string()))?;
            ui::display_boundary_warning(&BoundaryWarning::RepositoryInitialized {
                branch: primary.to_string(),
            });
        }

        let has_remote = self.repo.has_remote(remote).map_err(|e| {
            PublishError::remote_configuration(format!("Cannot read remote '{}': {}", remote, e))
        })?;
        if !has_remote {
            self.configure_remote(remote)?;
        }

        let branch = self.repo.current_branch().map_err(|e| {
            PublishError::branch_sync(format!("Cannot determine current branch: {}", e))
        })?;
        let dirty = self.repo.is_working_tree_dirty().map_err(|e| {
            PublishError::branch_sync(format!("Cannot read working tree status: {}", e))
        })?;
        let mut ctx = PublishContext::new(branch, primary, dirty);
        debug!(?ctx, "publish context");

        ui::display_status(&format!("Fetching latest data from '{}'", remote));
        self.repo.fetch(remote).map_err(|e| {
            PublishError::branch_sync(format!("Failed to fetch from '{}': {}", remote, e))
        })?;

        if self.repo.head_is_unborn()? {
            debug!(branch = %ctx.current_branch, "no commits yet, skipping branch sync");
            return Ok(ctx);
        }

        if !ctx.is_main_branch {
            let exists = self
                .repo
                .remote_branch_exists(remote, &ctx.current_branch)
                .map_err(|e| PublishError::branch_sync(e.to_string()))?;
            if !exists {
                ui::display_status(&format!(
                    "Creating remote branch '{}' on '{}'",
                    ctx.current_branch, remote
                ));
                self.push_branch(&ctx.current_branch, true)?;
            }
        }

        self.sync_primary(&mut ctx)?;
        Ok(ctx)
    }

    fn configure_remote(&mut self, remote: &str) -> Result<()> {
        let url = self.decisions.remote_url(remote).map_err(|e| {
            PublishError::remote_configuration(format!("No URL for remote '{}': {}", remote, e))
        })?;
        let url = url.trim();
        if url.is_empty() {
            return Err(PublishError::remote_configuration(format!(
                "URL for remote '{}' must not be empty",
                remote
            )));
        }

        self.repo.add_remote(remote, url).map_err(|e| {
            PublishError::remote_configuration(format!("Failed to add remote '{}': {}", remote, e))
        })?;
        ui::display_success(&format!("Added remote '{}' -> {}", remote, url));
        Ok(())
    }

    /// Stash, bring the primary branch up to date, switch back, restore.
    ///
    /// The switch back and the stash restore are attempted even when the pull
    /// fails; if both the pull and the restore fail the error names both.
    fn sync_primary(&mut self, ctx: &mut PublishContext) -> Result<()> {
        let config = self.config;
        let primary = config.repository.primary_branch.as_str();

        if ctx.working_tree_dirty {
            ui::display_status("Stashing local changes");
            self.repo
                .stash_save(&format!("git-sync-publish: syncing {}", primary))
                .map_err(|e| {
                    PublishError::branch_sync(format!("Failed to stash local changes: {}", e))
                })?;
            ctx.stash_taken = true;
        }

        let synced = self.pull_primary(ctx);
        let restored = self.restore_stash(ctx);

        match (synced, restored) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(message), Ok(())) | (Ok(()), Err(message)) => {
                Err(PublishError::branch_sync(message))
            }
            (Err(sync), Err(restore)) => Err(PublishError::branch_sync(format!(
                "{}; {}",
                sync, restore
            ))),
        }
    }

    fn pull_primary(&mut self, ctx: &PublishContext) -> std::result::Result<(), String> {
        let config = self.config;
        let primary = config.repository.primary_branch.as_str();
        let remote = config.repository.remote.as_str();

        if !ctx.is_main_branch {
            self.repo
                .checkout(primary)
                .map_err(|e| format!("Failed to checkout '{}': {}", primary, e))?;
        }

        ui::display_status(&format!("Pulling '{}' from '{}'", primary, remote));
        let pulled = self
            .repo
            .pull(remote, primary)
            .map_err(|e| format!("Failed to pull '{}' from '{}': {}", primary, remote, e));

        let switched_back = if ctx.is_main_branch {
            Ok(())
        } else {
            self.repo.checkout(&ctx.current_branch).map_err(|e| {
                format!("Failed to switch back to '{}': {}", ctx.current_branch, e)
            })
        };

        match (pulled, switched_back) {
            (Err(pull), Err(switch)) => Err(format!("{}; {}", pull, switch)),
            (pulled, switched_back) => pulled.and(switched_back),
        }
    }

    fn restore_stash(&mut self, ctx: &mut PublishContext) -> std::result::Result<(), String> {
        if !ctx.stash_taken {
            return Ok(());
        }

        // Never pop onto another branch; the changes stay in the stash instead
        let current = self
            .repo
            .current_branch()
            .map_err(|e| format!("Cannot determine branch before restoring stash: {}", e))?;
        if current != ctx.current_branch {
            return Err(format!(
                "Stashed changes kept in the stash: still on '{}' instead of '{}'",
                current, ctx.current_branch
            ));
        }

        ui::display_status("Restoring stashed changes");
        self.repo.stash_pop().map_err(|e| {
            format!(
                "Failed to restore stashed changes (they remain in the stash): {}",
                e
            )
        })?;
        ctx.stash_taken = false;
        Ok(())
    }

    /// BranchEnsured -> Classified
    fn classify(&mut self, ctx: &PublishContext) -> Result<Classification> {
        let markers = self.config.tagging.breaking_change_markers.as_slice();

        if !ctx.working_tree_dirty {
            let decision = match self.repo.head_commit_message()? {
                Some(message) => CommitDecision::from_commit_message(&message, markers),
                None => CommitDecision::default(),
            };
            ui::display_boundary_warning(&BoundaryWarning::CleanWorkingTree {
                category: decision.category,
            });
            return Ok(Classification::Reused(decision));
        }

        let category = self.decisions.choose_category()?;
        let description = self.decisions.describe_change()?;
        if description.trim().is_empty() {
            return Err(PublishError::commit("commit description must not be empty"));
        }

        let decision = CommitDecision::new(category, description, markers);
        let message = decision.message();
        let prompt = format!(
            "Commit all changes on '{}' as \"{}\"?",
            ctx.current_branch, message
        );
        if !self.decisions.confirm(&prompt)? {
            return Ok(Classification::Declined);
        }

        ui::display_status(&format!("Committing: {}", message));
        self.repo.commit_all(&message).map_err(|e| {
            PublishError::commit(format!(
                "Failed to commit on '{}': {}",
                ctx.current_branch, e
            ))
        })?;
        Ok(Classification::Committed(decision))
    }

    /// Classified -> Bumped
    fn bump(&mut self, decision: &CommitDecision) -> Result<(Option<String>, SemanticVersion)> {
        let config = self.config;
        let primary = config.repository.primary_branch.as_str();
        let latest = self.repo.latest_tag(primary, &config.tagging.prefix)?;

        let candidate = match &latest {
            Some(tag) => {
                let base = SemanticVersion::parse_tag(tag, &config.tagging.prefix)?;
                let next = base.bump(decision.category, decision.breaking);
                debug!(
                    %tag,
                    %base,
                    %next,
                    category = %decision.category,
                    breaking = decision.breaking,
                    "bumped"
                );
                next
            }
            None => {
                ui::display_boundary_warning(&BoundaryWarning::NoPreviousTag {
                    initial: SemanticVersion::INITIAL.to_string(),
                });
                SemanticVersion::INITIAL
            }
        };

        Ok((latest, candidate))
    }

    fn push_branch(&mut self, branch: &str, set_upstream: bool) -> Result<()> {
        let remote = self.config.repository.remote.as_str();
        let retry = self.retry;
        let repo = &mut *self.repo;

        retry
            .run(&format!("push branch {}", branch), |_| {
                repo.push_branch(remote, branch, set_upstream)
            })
            .map_err(|exhausted| PublishError::PushExhausted {
                target: format!("branch {}", branch),
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.to_string(),
            })?;

        ui::display_success(&format!("Pushed branch '{}' to '{}'", branch, remote));
        Ok(())
    }

    fn push_tag(&mut self, tag_name: &str) -> Result<()> {
        let remote = self.config.repository.remote.as_str();
        let retry = self.retry;
        let repo = &mut *self.repo;

        retry
            .run(&format!("push tag {}", tag_name), |_| {
                repo.push_tag(remote, tag_name)
            })
            .map_err(|exhausted| PublishError::PushExhausted {
                target: format!("tag {}", tag_name),
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.to_string(),
            })?;

        ui::display_success(&format!("Pushed tag '{}' to '{}'", tag_name, remote));
        Ok(())
    }
}
