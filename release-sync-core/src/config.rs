use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::contract::ReleaseFields;
use crate::error::PublishError;

/// Ref namespace stripped from tag and release name inputs.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Everything one invocation needs to know about the release it publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Normalized tag name (no `refs/tags/` prefix). Never empty.
    pub tag: String,
    pub release_name: Option<String>,
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub target_commitish: String,
    pub asset_dir: Option<PathBuf>,
}

impl ReleaseRequest {
    /// Builds a request, normalizing `tag` and `release_name`.
    ///
    /// Fails with a configuration error when the tag is empty after normalization.
    pub fn new(
        tag: &str,
        release_name: Option<&str>,
        body: Option<&str>,
        draft: bool,
        prerelease: bool,
        target_commitish: &str,
        asset_dir: Option<PathBuf>,
    ) -> Result<Self, PublishError> {
        let tag = normalize_ref(tag.trim());
        if tag.is_empty() {
            return Err(PublishError::Config("tag_name must not be empty".into()));
        }
        if target_commitish.trim().is_empty() {
            return Err(PublishError::Config(
                "target commitish must not be empty".into(),
            ));
        }
        let release_name = release_name
            .map(|n| normalize_ref(n.trim()).to_string())
            .filter(|n| !n.is_empty());

        Ok(ReleaseRequest {
            tag: tag.to_string(),
            release_name,
            body: body.map(str::to_string),
            draft,
            prerelease,
            target_commitish: target_commitish.trim().to_string(),
            asset_dir,
        })
    }

    /// The field set sent to the platform. A missing name falls back to the tag.
    pub fn fields(&self) -> ReleaseFields {
        ReleaseFields {
            tag_name: self.tag.clone(),
            name: self
                .release_name
                .clone()
                .unwrap_or_else(|| self.tag.clone()),
            body: self.body.clone().unwrap_or_default(),
            draft: self.draft,
            prerelease: self.prerelease,
            target_commitish: self.target_commitish.clone(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            tag = %self.tag,
            draft = self.draft,
            prerelease = self.prerelease,
            target_commitish = %self.target_commitish,
            asset_dir = ?self.asset_dir,
            "Loaded ReleaseRequest"
        );
        debug!(?self, "ReleaseRequest loaded (full debug)");
    }
}

/// Strips the leading `refs/tags/` namespace. Applying it twice gives the same result as once.
///
/// Loops so that a doubled prefix is also removed; otherwise normalizing would not be idempotent.
pub fn normalize_ref(value: &str) -> &str {
    let mut rest = value;
    while let Some(stripped) = rest.strip_prefix(TAG_REF_PREFIX) {
        rest = stripped;
    }
    rest
}

/// How an existing release is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LookupStrategy {
    /// First draft release in the first page of the listing, regardless of tag.
    #[default]
    ByDraft,
    /// Release whose tag equals the normalized tag.
    ByTag,
}

impl FromStr for LookupStrategy {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" | "by-draft" | "by_draft" => Ok(LookupStrategy::ByDraft),
            "tag" | "by-tag" | "by_tag" => Ok(LookupStrategy::ByTag),
            other => Err(PublishError::Config(format!(
                "unsupported lookup strategy {other:?} (expected \"draft\" or \"tag\")"
            ))),
        }
    }
}

/// Parses a CI boolean input. Empty means `false`.
pub fn parse_bool_input(name: &str, value: &str) -> Result<bool, PublishError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(PublishError::Config(format!(
            "input {name} must be \"true\" or \"false\", got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tag_namespace() {
        assert_eq!(normalize_ref("refs/tags/v1.10.15"), "v1.10.15");
        assert_eq!(normalize_ref("v1.10.15"), "v1.10.15");
        assert_eq!(normalize_ref("refs/heads/main"), "refs/heads/main");
        assert_eq!(normalize_ref(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for tag in [
            "v1.0.0",
            "refs/tags/v1.0.0",
            "refs/tags/refs/tags/v2",
            "refs/tags/",
            "release refs/tags/x",
        ] {
            let once = normalize_ref(tag);
            assert_eq!(normalize_ref(once), once, "not idempotent for {tag:?}");
        }
        assert_eq!(normalize_ref("refs/tags/refs/tags/v2"), "v2");
    }

    #[test]
    fn request_rejects_empty_tag() {
        let err = ReleaseRequest::new("refs/tags/", None, None, false, false, "abc", None)
            .unwrap_err();
        assert!(matches!(err, PublishError::Config(_)));
    }

    #[test]
    fn fields_default_name_to_tag_and_body_to_empty() {
        let req = ReleaseRequest::new(
            "refs/tags/v0.3.0",
            Some("  "),
            None,
            true,
            false,
            "deadbeef",
            None,
        )
        .unwrap();
        let fields = req.fields();
        assert_eq!(fields.tag_name, "v0.3.0");
        assert_eq!(fields.name, "v0.3.0");
        assert_eq!(fields.body, "");
        assert!(fields.draft);
        assert_eq!(fields.target_commitish, "deadbeef");
    }

    #[test]
    fn release_name_is_normalized() {
        let req = ReleaseRequest::new(
            "v1",
            Some("refs/tags/Release v1"),
            Some("notes"),
            false,
            true,
            "main",
            None,
        )
        .unwrap();
        assert_eq!(req.release_name.as_deref(), Some("Release v1"));
        assert_eq!(req.fields().body, "notes");
    }

    #[test]
    fn parse_bool_accepts_true_false_and_empty() {
        assert!(parse_bool_input("draft", "true").unwrap());
        assert!(parse_bool_input("draft", " TRUE ").unwrap());
        assert!(!parse_bool_input("draft", "false").unwrap());
        assert!(!parse_bool_input("draft", "").unwrap());
        assert!(parse_bool_input("draft", "yes").is_err());
    }

    #[test]
    fn lookup_strategy_parses_and_defaults_to_draft() {
        assert_eq!(LookupStrategy::default(), LookupStrategy::ByDraft);
        assert_eq!("tag".parse::<LookupStrategy>().unwrap(), LookupStrategy::ByTag);
        assert_eq!("Draft".parse::<LookupStrategy>().unwrap(), LookupStrategy::ByDraft);
        assert!("latest".parse::<LookupStrategy>().is_err());
    }
}
