use crate::domain::{CommitDecision, SemanticVersion};

/// A release tag: a resolved version plus its annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub version: SemanticVersion,
    pub prefix: String,
    pub annotation: String,
}

impl Tag {
    /// Create the tag for `version`, annotated from the change being released
    pub fn new(
        version: SemanticVersion,
        prefix: impl Into<String>,
        decision: &CommitDecision,
    ) -> Self {
        let prefix = prefix.into();
        let name = tag_name(&prefix, &version);
        let annotation = if decision.is_neutral() {
            format!("Release {}", name)
        } else {
            format!("Release {}: {}", name, decision.message())
        };

        Tag {
            version,
            prefix,
            annotation,
        }
    }

    /// Full tag name (e.g., "v1.2.3")
    pub fn name(&self) -> String {
        tag_name(&self.prefix, &self.version)
    }
}

/// Format a version with a tag prefix
pub fn tag_name(prefix: &str, version: &SemanticVersion) -> String {
    format!("{}{}", prefix, version)
}
