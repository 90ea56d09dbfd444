use crate::domain::ChangeCategory;
use crate::error::{PublishError, Result};
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemanticVersion {
    /// Version used for the first release of a repository without tags
    pub const INITIAL: SemanticVersion = SemanticVersion {
        major: 0,
        minor: 1,
        patch: 0,
    };

    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> 1.2.3, "v2" -> 2.0.0)
    ///
    /// A non-numeric prefix such as `v` or `release` is skipped. Up to three
    /// dot-separated numeric components follow; missing ones default to 0.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let numeric = trimmed.trim_start_matches(|c: char| {
            !(c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
        });

        parse_numeric(tag, numeric)
    }

    /// Parse a tag carrying a known `prefix` (e.g. `release-` in "release-1.2.3")
    ///
    /// Tags without the prefix are parsed like [SemanticVersion::parse].
    pub fn parse_tag(tag: &str, prefix: &str) -> Result<Self> {
        match tag.trim().strip_prefix(prefix) {
            Some(numeric) if !prefix.is_empty() => parse_numeric(tag, numeric),
            _ => SemanticVersion::parse(tag),
        }
    }

    /// Compute the next version for a change
    ///
    /// Breaking features bump major, features bump minor, everything else bumps patch.
    pub fn bump(&self, category: ChangeCategory, breaking: bool) -> Self {
        self.apply(VersionBump::for_change(category, breaking))
    }

    /// Apply a bump type, resetting the lower components
    pub fn apply(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => SemanticVersion {
                major: self.major.saturating_add(1),
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => SemanticVersion {
                major: self.major,
                minor: self.minor.saturating_add(1),
                patch: 0,
            },
            VersionBump::Patch => self.next_patch(),
        }
    }

    /// Same major and minor, patch + 1
    pub fn next_patch(&self) -> Self {
        SemanticVersion {
            patch: self.patch.saturating_add(1),
            ..*self
        }
    }
}

fn parse_numeric(tag: &str, numeric: &str) -> Result<SemanticVersion> {
    if numeric.is_empty() {
        return Err(PublishError::malformed_tag(tag, "no version number found"));
    }

    let parts: Vec<&str> = numeric.split('.').collect();
    if parts.len() > 3 {
        return Err(PublishError::malformed_tag(
            tag,
            format!("expected at most 3 components, found {}", parts.len()),
        ));
    }

    let mut components = [0u32; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        *slot = parse_component(tag, part)?;
    }

    Ok(SemanticVersion::new(
        components[0],
        components[1],
        components[2],
    ))
}

fn parse_component(tag: &str, part: &str) -> Result<u32> {
    if part.is_empty() {
        return Err(PublishError::malformed_tag(tag, "empty version component"));
    }
    if !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(PublishError::malformed_tag(
            tag,
            format!("component '{}' is not a non-negative integer", part),
        ));
    }
    part.parse::<u32>().map_err(|_| {
        PublishError::malformed_tag(tag, format!("component '{}' is out of range", part))
    })
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Pick the bump for a classified change
    pub fn for_change(category: ChangeCategory, breaking: bool) -> Self {
        match (category, breaking) {
            (ChangeCategory::Feature, true) => VersionBump::Major,
            (ChangeCategory::Feature, false) => VersionBump::Minor,
            _ => VersionBump::Patch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = SemanticVersion::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_without_prefix() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v, SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_word_prefix() {
        assert_eq!(
            SemanticVersion::parse("release1.4.0").unwrap(),
            SemanticVersion::new(1, 4, 0)
        );
        assert_eq!(
            SemanticVersion::parse("V0.9.12").unwrap(),
            SemanticVersion::new(0, 9, 12)
        );
    }

    #[test]
    fn test_parse_tag_with_hyphenated_prefix() {
        assert_eq!(
            SemanticVersion::parse_tag("release-0.9.9", "release-").unwrap(),
            SemanticVersion::new(0, 9, 9)
        );
        assert!(SemanticVersion::parse("release-0.9.9").is_err());
    }

    #[test]
    fn test_parse_tag_without_prefix_falls_back() {
        assert_eq!(
            SemanticVersion::parse_tag("v2.0.1", "release-").unwrap(),
            SemanticVersion::new(2, 0, 1)
        );
        assert_eq!(
            SemanticVersion::parse_tag("1.2", "").unwrap(),
            SemanticVersion::new(1, 2, 0)
        );
        assert!(SemanticVersion::parse_tag("release--1.0.0", "release-").is_err());
    }

    #[test]
    fn test_version_parse_zero_fills_missing_components() {
        assert_eq!(
            SemanticVersion::parse("v2").unwrap(),
            SemanticVersion::new(2, 0, 0)
        );
        assert_eq!(
            SemanticVersion::parse("v2.7").unwrap(),
            SemanticVersion::new(2, 7, 0)
        );
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(SemanticVersion::parse("v1.2.3.4").is_err());
        assert!(SemanticVersion::parse("v1.x.3").is_err());
        assert!(SemanticVersion::parse("v").is_err());
        assert!(SemanticVersion::parse("").is_err());
        assert!(SemanticVersion::parse("v1..3").is_err());
        assert!(SemanticVersion::parse("v1.2.").is_err());
    }

    #[test]
    fn test_version_parse_rejects_negative_and_suffixes() {
        assert!(SemanticVersion::parse("v-1.2.3").is_err());
        assert!(SemanticVersion::parse("v1.-2.3").is_err());
        assert!(SemanticVersion::parse("v1.2.3-rc1").is_err());
        assert!(SemanticVersion::parse("v1.+2.3").is_err());
    }

    #[test]
    fn test_version_parse_error_is_malformed_tag() {
        match SemanticVersion::parse("v1.2.3.4") {
            Err(PublishError::MalformedTag { tag, .. }) => assert_eq!(tag, "v1.2.3.4"),
            other => panic!("expected MalformedTag, got {:?}", other),
        }
    }

    #[test]
    fn test_version_parse_overflow() {
        assert!(SemanticVersion::parse("v99999999999.0.0").is_err());
    }

    #[test]
    fn test_round_trip_through_display() {
        for (major, minor, patch) in [(0, 0, 0), (1, 2, 3), (10, 0, 42), (3, 14, 159)] {
            let tag = format!("v{}.{}.{}", major, minor, patch);
            let parsed = SemanticVersion::parse(&tag).unwrap();
            assert_eq!(format!("v{}", parsed), tag);
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(SemanticVersion::new(1, 2, 3) < SemanticVersion::new(1, 3, 0));
        assert!(SemanticVersion::new(1, 9, 9) < SemanticVersion::new(2, 0, 0));
        assert!(SemanticVersion::new(1, 2, 10) > SemanticVersion::new(1, 2, 9));
    }

    #[test]
    fn test_bump_breaking_feature() {
        let v = SemanticVersion::new(2, 5, 1);
        assert_eq!(
            v.bump(ChangeCategory::Feature, true),
            SemanticVersion::new(3, 0, 0)
        );
    }

    #[test]
    fn test_bump_feature() {
        let v = SemanticVersion::new(1, 2, 3);
        assert_eq!(
            v.bump(ChangeCategory::Feature, false),
            SemanticVersion::new(1, 3, 0)
        );
    }

    #[test]
    fn test_bump_first_feature_from_zero() {
        assert_eq!(
            SemanticVersion::default().bump(ChangeCategory::Feature, false),
            SemanticVersion::INITIAL
        );
    }

    #[test]
    fn test_bump_non_feature_categories_touch_patch_only() {
        let base = SemanticVersion::new(1, 3, 2);
        for category in ChangeCategory::SELECTABLE
            .iter()
            .copied()
            .filter(|c| *c != ChangeCategory::Feature)
            .chain(std::iter::once(ChangeCategory::Other))
        {
            for breaking in [false, true] {
                let bumped = base.bump(category, breaking);
                assert_eq!(bumped.major, base.major);
                assert_eq!(bumped.minor, base.minor);
                assert_eq!(bumped.patch, base.patch + 1, "category {:?}", category);
            }
        }
    }

    #[test]
    fn test_bump_is_pure() {
        let base = SemanticVersion::new(4, 1, 7);
        let first = base.bump(ChangeCategory::Feature, false);
        let second = base.bump(ChangeCategory::Feature, false);
        assert_eq!(first, second);
        assert_eq!(base, SemanticVersion::new(4, 1, 7));
    }

    #[test]
    fn test_bump_saturates() {
        let v = SemanticVersion::new(0, 0, u32::MAX);
        assert_eq!(v.next_patch().patch, u32::MAX);
    }

    #[test]
    fn test_version_display() {
        let v = SemanticVersion::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
    }
}
