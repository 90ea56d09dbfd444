/// Per-run state of the working copy being published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishContext {
    pub current_branch: String,
    pub is_main_branch: bool,
    pub working_tree_dirty: bool,
    pub stash_taken: bool,
}

impl PublishContext {
    /// Create a new context for `branch`, compared against the primary branch name
    pub fn new(branch: impl Into<String>, primary_branch: &str, working_tree_dirty: bool) -> Self {
        let current_branch = branch.into();
        let is_main_branch = current_branch == primary_branch;

        PublishContext {
            current_branch,
            is_main_branch,
            working_tree_dirty,
            stash_taken: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_branch() {
        let ctx = PublishContext::new("main", "main", false);
        assert!(ctx.is_main_branch);
        assert!(!ctx.stash_taken);
    }

    #[test]
    fn test_configured_primary_branch() {
        let ctx = PublishContext::new("master", "master", true);
        assert!(ctx.is_main_branch);
        assert!(ctx.working_tree_dirty);
    }

    #[test]
    fn test_feature_branch() {
        let ctx = PublishContext::new("feature/login", "main", true);
        assert!(!ctx.is_main_branch);
        assert_eq!(ctx.current_branch, "feature/login");
    }
}
