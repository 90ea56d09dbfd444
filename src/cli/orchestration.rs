//! Main workflow orchestration logic
//!
//! Wires the real git repository and the terminal prompts into the publish
//! sequence. Kept apart from main.rs so the workflow can be called
//! programmatically without depending on clap.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::git::Git2Repository;
use crate::publish::{PublishOutcome, PublishSequencer};
use crate::ui::{self, TerminalDecisions};

/// Arguments for the publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Working copy to publish from
    pub path: PathBuf,

    /// Answer yes to every confirmation
    pub assume_yes: bool,
}

impl Default for PublishWorkflowArgs {
    fn default() -> Self {
        PublishWorkflowArgs {
            path: PathBuf::from("."),
            assume_yes: false,
        }
    }
}

/// Main publish workflow
///
/// Opens (or prepares to initialize) the repository at `args.path` and runs
/// one publish sequence against it with interactive prompts.
pub fn run_publish_workflow(args: PublishWorkflowArgs, config: &Config) -> Result<PublishOutcome> {
    info!(path = %args.path.display(), "starting publish workflow");

    let mut repo = Git2Repository::open(&args.path)
        .with_context(|| format!("Cannot open '{}'", args.path.display()))?;
    let mut decisions = TerminalDecisions::stdio(args.assume_yes);

    let outcome = PublishSequencer::new(&mut repo, &mut decisions, config).run()?;

    match &outcome {
        PublishOutcome::Published(result) => ui::display_published(&result.tag, &result.branch),
        PublishOutcome::Cancelled { reason } => println!("{}", reason),
    }

    Ok(outcome)
}
