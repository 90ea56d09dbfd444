use std::fmt;

/// Conventional commit category of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeCategory {
    Feature,
    Fix,
    Chore,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    /// Unrecognized token; bumps like a fix
    #[default]
    Other,
}

impl ChangeCategory {
    /// Categories offered when classifying a change, in menu order
    pub const SELECTABLE: [ChangeCategory; 10] = [
        ChangeCategory::Feature,
        ChangeCategory::Fix,
        ChangeCategory::Chore,
        ChangeCategory::Docs,
        ChangeCategory::Style,
        ChangeCategory::Refactor,
        ChangeCategory::Perf,
        ChangeCategory::Test,
        ChangeCategory::Build,
        ChangeCategory::Ci,
    ];

    /// Map a commit type token (e.g. "feat", "fix") to a category
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "feat" | "feature" => ChangeCategory::Feature,
            "fix" => ChangeCategory::Fix,
            "chore" => ChangeCategory::Chore,
            "docs" => ChangeCategory::Docs,
            "style" => ChangeCategory::Style,
            "refactor" => ChangeCategory::Refactor,
            "perf" => ChangeCategory::Perf,
            "test" => ChangeCategory::Test,
            "build" => ChangeCategory::Build,
            "ci" => ChangeCategory::Ci,
            _ => ChangeCategory::Other,
        }
    }

    /// The token written in front of commit messages
    pub fn token(&self) -> &'static str {
        match self {
            ChangeCategory::Feature => "feat",
            ChangeCategory::Fix => "fix",
            ChangeCategory::Chore => "chore",
            ChangeCategory::Docs => "docs",
            ChangeCategory::Style => "style",
            ChangeCategory::Refactor => "refactor",
            ChangeCategory::Perf => "perf",
            ChangeCategory::Test => "test",
            ChangeCategory::Build => "build",
            ChangeCategory::Ci => "ci",
            ChangeCategory::Other => "other",
        }
    }

    /// Short human description for the selection menu
    pub fn summary(&self) -> &'static str {
        match self {
            ChangeCategory::Feature => "A new feature",
            ChangeCategory::Fix => "A bug fix",
            ChangeCategory::Chore => "Maintenance that doesn't touch src or tests",
            ChangeCategory::Docs => "Documentation only changes",
            ChangeCategory::Style => "Formatting, whitespace, missing semicolons",
            ChangeCategory::Refactor => "Code change that neither fixes a bug nor adds a feature",
            ChangeCategory::Perf => "A performance improvement",
            ChangeCategory::Test => "Adding or correcting tests",
            ChangeCategory::Build => "Build system or external dependency changes",
            ChangeCategory::Ci => "CI configuration changes",
            ChangeCategory::Other => "Anything else",
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_known() {
        assert_eq!(ChangeCategory::from_token("feat"), ChangeCategory::Feature);
        assert_eq!(ChangeCategory::from_token("feature"), ChangeCategory::Feature);
        assert_eq!(ChangeCategory::from_token("FIX"), ChangeCategory::Fix);
        assert_eq!(ChangeCategory::from_token(" ci "), ChangeCategory::Ci);
    }

    #[test]
    fn test_from_token_unknown_is_other() {
        assert_eq!(ChangeCategory::from_token("wip"), ChangeCategory::Other);
        assert_eq!(ChangeCategory::from_token(""), ChangeCategory::Other);
    }

    #[test]
    fn test_selectable_tokens_round_trip() {
        for category in ChangeCategory::SELECTABLE {
            assert_eq!(ChangeCategory::from_token(category.token()), category);
        }
    }

    #[test]
    fn test_default_is_other() {
        assert_eq!(ChangeCategory::default(), ChangeCategory::Other);
    }
}
