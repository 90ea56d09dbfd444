//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and logging setup

use std::io::{self, BufRead, Write};

use crate::decision::DecisionProvider;
use crate::domain::ChangeCategory;
use crate::error::{PublishError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_proposed_tag, display_published,
    display_status, display_success,
};

/// Install the tracing subscriber used by the binary.
///
/// `RUST_LOG` wins when set; otherwise only warnings are logged, or
/// everything from this crate down to debug when `verbose` is set.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = if verbose {
        "git_sync_publish=debug"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

/// Interactive [DecisionProvider] reading answers from a terminal.
///
/// With `assume_yes` every confirmation is answered with yes without
/// prompting; the category and description are still asked for.
pub struct TerminalDecisions<I, O> {
    input: I,
    output: O,
    assume_yes: bool,
}

impl TerminalDecisions<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(assume_yes: bool) -> Self {
        TerminalDecisions::with_io(io::stdin().lock(), io::stdout(), assume_yes)
    }
}

impl<I: BufRead, O: Write> TerminalDecisions<I, O> {
    pub fn with_io(input: I, output: O, assume_yes: bool) -> Self {
        TerminalDecisions {
            input,
            output,
            assume_yes,
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(PublishError::prompt("unexpected end of input"));
        }
        Ok(line.trim().to_string())
    }
}

/// Accepts a 1-based menu index or a category token such as `feat`
pub fn parse_category_selection(selection: &str) -> Result<ChangeCategory> {
    let selection = selection.trim();

    if let Ok(index) = selection.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| ChangeCategory::SELECTABLE.get(i).copied())
            .ok_or_else(|| PublishError::prompt(format!("Invalid selection '{}'", selection)));
    }

    match ChangeCategory::from_token(selection) {
        ChangeCategory::Other => Err(PublishError::prompt(format!(
            "Invalid selection '{}'",
            selection
        ))),
        category => Ok(category),
    }
}

impl<I: BufRead, O: Write> DecisionProvider for TerminalDecisions<I, O> {
    fn remote_url(&mut self, remote: &str) -> Result<String> {
        writeln!(self.output, "\nNo remote named '{}' is configured.", remote)?;
        self.ask(&format!("Enter the URL for '{}': ", remote))
    }

    fn choose_category(&mut self) -> Result<ChangeCategory> {
        writeln!(self.output, "\nSelect the type of change:")?;
        write!(self.output, "{}", formatter::category_menu())?;
        let selection = self.ask(&format!(
            "\nType (1-{} or name): ",
            ChangeCategory::SELECTABLE.len()
        ))?;
        parse_category_selection(&selection)
    }

    fn describe_change(&mut self) -> Result<String> {
        self.ask("Short description of the change: ")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "\n{} (y/N): y", prompt)?;
            return Ok(true);
        }

        let response = self.ask(&format!("\n{} (y/N): ", prompt))?.to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}
