use regex::Regex;

use crate::domain::ChangeCategory;

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message in Conventional Commits format
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    pub fn parse(message: &str) -> Self {
        let subject = message.lines().next().unwrap_or_default().trim();

        if let Some(captures) = Regex::new(r"^([A-Za-z]+)(?:\([^)]+\))?(!?):\s*(.*)$")
            .ok()
            .and_then(|re| re.captures(subject))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            let has_exclamation = captures.get(2).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                description,
                is_breaking_change: has_exclamation || message.contains("BREAKING CHANGE:"),
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "chore".to_string(),
            description: subject.to_string(),
            is_breaking_change: false,
        }
    }
}

/// The classification of the change being published in this run
///
/// Threaded explicitly from classification through bumping and tagging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitDecision {
    pub category: ChangeCategory,
    pub description: String,
    pub breaking: bool,
}

impl CommitDecision {
    /// Build a decision from user input; `breaking` is set when the
    /// description carries one of `markers`
    pub fn new(
        category: ChangeCategory,
        description: impl Into<String>,
        markers: &[String],
    ) -> Self {
        let description = description.into().trim().to_string();
        let breaking = contains_marker(&description, markers);

        CommitDecision {
            category,
            description,
            breaking,
        }
    }

    /// Recover the decision recorded in an existing commit message
    pub fn from_commit_message(message: &str, markers: &[String]) -> Self {
        let parsed = ParsedCommit::parse(message);

        CommitDecision {
            category: ChangeCategory::from_token(&parsed.r#type),
            breaking: parsed.is_breaking_change || contains_marker(message, markers),
            description: parsed.description,
        }
    }

    /// Commit message in `category: description` form
    pub fn message(&self) -> String {
        format!("{}: {}", self.category.token(), self.description)
    }

    /// True for the neutral default used when nothing is known about the change
    pub fn is_neutral(&self) -> bool {
        self.description.is_empty()
    }
}

fn contains_marker(text: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|marker| !marker.is_empty() && text.contains(marker.as_str()))
}
