//! Decisions that need a human: remote URL, change category, description and
//! confirmations.
//!
//! The sequencer only talks to [DecisionProvider]. The interactive terminal
//! implementation lives in [crate::ui]; [ScriptedDecisions] answers from a
//! prepared script and records the prompts it was shown.

use std::collections::VecDeque;

use crate::domain::ChangeCategory;
use crate::error::{PublishError, Result};

/// Source of answers for the questions asked during a publish run
pub trait DecisionProvider {
    /// URL to configure for a missing remote
    fn remote_url(&mut self, remote: &str) -> Result<String>;

    /// Category of the pending change
    fn choose_category(&mut self) -> Result<ChangeCategory>;

    /// One-line description of the pending change
    fn describe_change(&mut self) -> Result<String>;

    /// Yes/no confirmation
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Non-interactive provider answering from queued responses
#[derive(Debug, Default, Clone)]
pub struct ScriptedDecisions {
    remote_url: Option<String>,
    categories: VecDeque<ChangeCategory>,
    descriptions: VecDeque<String>,
    confirmations: VecDeque<bool>,
    prompts: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Queue the answer to the next category/description/confirmation round
    pub fn with_change(
        mut self,
        category: ChangeCategory,
        description: impl Into<String>,
        confirm: bool,
    ) -> Self {
        self.categories.push_back(category);
        self.descriptions.push_back(description.into());
        self.confirmations.push_back(confirm);
        self
    }

    /// Every confirmation prompt shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn remote_url(&mut self, remote: &str) -> Result<String> {
        self.remote_url
            .clone()
            .ok_or_else(|| PublishError::prompt(format!("no URL scripted for remote '{}'", remote)))
    }

    fn choose_category(&mut self) -> Result<ChangeCategory> {
        self.categories
            .pop_front()
            .ok_or_else(|| PublishError::prompt("no category scripted"))
    }

    fn describe_change(&mut self) -> Result<String> {
        self.descriptions
            .pop_front()
            .ok_or_else(|| PublishError::prompt("no description scripted"))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        self.confirmations
            .pop_front()
            .ok_or_else(|| PublishError::prompt(format!("no answer scripted for '{}'", prompt)))
    }
}
