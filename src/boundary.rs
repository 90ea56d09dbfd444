use std::fmt;

use crate::domain::ChangeCategory;

/// Non-fatal conditions met while publishing.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Nothing to commit; the tag is derived from the last known category
    CleanWorkingTree { category: ChangeCategory },
    /// No version tag reachable; publishing the first release
    NoPreviousTag { initial: String },
    /// The bumped tag already existed and was skipped
    TagCollision { requested: String, resolved: String },
    /// A new repository was created in the working directory
    RepositoryInitialized { branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::CleanWorkingTree { category } => {
                write!(
                    f,
                    "Working tree is clean, nothing to commit (tagging as '{}')",
                    category
                )
            }
            BoundaryWarning::NoPreviousTag { initial } => {
                write!(f, "No previous version tag found, starting at {}", initial)
            }
            BoundaryWarning::TagCollision {
                requested,
                resolved,
            } => {
                write!(
                    f,
                    "Tag '{}' already exists, using '{}' instead",
                    requested, resolved
                )
            }
            BoundaryWarning::RepositoryInitialized { branch } => {
                write!(f, "Initialized a new git repository on branch '{}'", branch)
            }
        }
    }
}
