use thiserror::Error;

/// Unified error type for git-sync-publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to initialize repository: {0}")]
    RepositoryInit(String),

    #[error("Remote configuration error: {0}")]
    RemoteConfiguration(String),

    #[error("Branch sync failed: {0}")]
    BranchSync(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Malformed tag '{tag}': {reason}")]
    MalformedTag { tag: String, reason: String },

    #[error("Failed to push {target} after {attempts} attempts: {last_error}")]
    PushExhausted {
        target: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Failed to tag the commit: {0}")]
    TagCreation(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-sync-publish
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    pub fn repository_init(msg: impl Into<String>) -> Self {
        PublishError::RepositoryInit(msg.into())
    }

    pub fn remote_configuration(msg: impl Into<String>) -> Self {
        PublishError::RemoteConfiguration(msg.into())
    }

    pub fn branch_sync(msg: impl Into<String>) -> Self {
        PublishError::BranchSync(msg.into())
    }

    pub fn commit(msg: impl Into<String>) -> Self {
        PublishError::Commit(msg.into())
    }

    /// Create a malformed tag error for `tag` with a reason
    pub fn malformed_tag(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        PublishError::MalformedTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    pub fn tag_creation(msg: impl Into<String>) -> Self {
        PublishError::TagCreation(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        PublishError::Remote(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        PublishError::Prompt(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PublishError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PublishError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_push_exhausted_names_target_and_attempts() {
        let err = PublishError::PushExhausted {
            target: "branch feature/login".to_string(),
            attempts: 3,
            last_error: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to push branch feature/login after 3 attempts"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_tag_creation_message() {
        let err = PublishError::tag_creation("reference already exists");
        assert!(err.to_string().starts_with("Failed to tag the commit"));
    }

    #[test]
    fn test_malformed_tag_message() {
        let err = PublishError::malformed_tag("v1.x.3", "component 'x' is not a number");
        assert_eq!(
            err.to_string(),
            "Malformed tag 'v1.x.3': component 'x' is not a number"
        );
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (
                PublishError::repository_init("x"),
                "Failed to initialize repository",
            ),
            (
                PublishError::remote_configuration("x"),
                "Remote configuration error",
            ),
            (PublishError::branch_sync("x"), "Branch sync failed"),
            (PublishError::commit("x"), "Commit failed"),
            (PublishError::remote("x"), "Remote operation failed"),
            (PublishError::prompt("x"), "Input error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
