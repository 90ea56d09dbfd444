//! Domain logic - pure business rules independent of git operations

pub mod category;
pub mod commit;
pub mod context;
pub mod tag;
pub mod version;

pub use category::ChangeCategory;
pub use commit::{CommitDecision, ParsedCommit};
pub use context::PublishContext;
pub use tag::{tag_name, Tag};
pub use version::{SemanticVersion, VersionBump};
