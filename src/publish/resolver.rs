use tracing::debug;

use crate::domain::{tag_name, SemanticVersion};
use crate::error::{PublishError, Result};
use crate::git::Repository;

/// Outcome of resolving a candidate against existing tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub version: SemanticVersion,
    /// Existing versions skipped on the way
    pub collisions: u32,
}

/// Finds the first version at or after a candidate whose tag is free.
///
/// Collisions always advance the patch component by one, whatever component
/// the original bump touched.
#[derive(Debug, Clone)]
pub struct TagCollisionResolver {
    prefix: String,
}

impl TagCollisionResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        TagCollisionResolver {
            prefix: prefix.into(),
        }
    }

    /// Re-fetch tags from `remote`, then probe the repository for free tags
    pub fn resolve_against<R: Repository>(
        &self,
        repo: &mut R,
        remote: &str,
        candidate: SemanticVersion,
    ) -> Result<Resolution> {
        repo.fetch_tags(remote).map_err(|e| {
            PublishError::branch_sync(format!("Failed to fetch tags from '{}': {}", remote, e))
        })?;

        let repo = &*repo;
        try_resolve(candidate, |version| {
            repo.tag_exists(&tag_name(&self.prefix, version))
        })
    }
}

/// Advance `candidate` by patch until `exists` reports it free
pub fn resolve<F>(candidate: SemanticVersion, mut exists: F) -> SemanticVersion
where
    F: FnMut(&SemanticVersion) -> bool,
{
    let mut version = candidate;
    while exists(&version) {
        version = version.next_patch();
    }
    version
}

/// Fallible form of [resolve] for predicates backed by I/O
pub fn try_resolve<F>(candidate: SemanticVersion, mut exists: F) -> Result<Resolution>
where
    F: FnMut(&SemanticVersion) -> Result<bool>,
{
    let mut version = candidate;
    let mut collisions = 0;

    while exists(&version)? {
        debug!(%version, "version already tagged");
        collisions += 1;
        version = version.next_patch();
    }

    Ok(Resolution {
        version,
        collisions,
    })
}
