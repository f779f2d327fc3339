use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::{BundleError, Result};

/// Placeholder stamped with the generation time
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// Default label template: the generation time alone
pub const DEFAULT_TAG_TEMPLATE: &str = "{timestamp}";

/// Start component used when a range begins at the repository root
pub const ROOT_START_ID: &str = "00000000";

/// Zero-padded so tags sort chronologically as plain text
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Identifier stamped onto the database for a release bundle.
///
/// Rendered as `{label}-{start}-{end}` where start and end are abbreviated
/// commit ids. The label may itself contain dashes; parsing splits from
/// the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl ReleaseTag {
    pub fn new(label: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        ReleaseTag {
            label: label.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parse a recorded bundle name (e.g. "20260101-093000-1a2b3c4d-5e6f7a8b")
    pub fn parse(name: &str) -> Result<Self> {
        let mut parts = name.trim().rsplitn(3, '-');
        let end = parts.next().unwrap_or_default();
        let start = parts.next().unwrap_or_default();
        let label = parts.next().unwrap_or_default();

        if label.is_empty() || !is_commit_id(start) || !is_commit_id(end) {
            return Err(BundleError::config(format!(
                "Cannot extract commits from release bundle name '{}'",
                name
            )));
        }

        Ok(ReleaseTag::new(label, start, end))
    }

    pub fn starts_at_root(&self) -> bool {
        self.start == ROOT_START_ID
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.label, self.start, self.end)
    }
}

fn is_commit_id(s: &str) -> bool {
    s.len() >= 4 && s.len() <= 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Template for the label part of a release tag (e.g. "{timestamp}", "v2.4")
#[derive(Debug, Clone)]
pub struct TagTemplate {
    pub template: String,
}

impl TagTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        TagTemplate {
            template: template.into(),
        }
    }

    /// Render the label for a generation time
    /// Example: template="{timestamp}" -> "20261016-093000"
    pub fn label(&self, generated_at: DateTime<Utc>) -> String {
        self.template.replace(
            TIMESTAMP_PLACEHOLDER,
            &generated_at.format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    /// Render the full tag for a range
    pub fn render(&self, generated_at: DateTime<Utc>, start: &str, end: &str) -> Result<ReleaseTag> {
        let label = self.label(generated_at);
        if label.trim().is_empty() {
            return Err(BundleError::config(format!(
                "Tag template '{}' renders an empty label",
                self.template
            )));
        }
        if label.chars().any(|c| c.is_whitespace() || c == '\'') {
            return Err(BundleError::config(format!(
                "Release label '{}' must not contain whitespace or quotes",
                label
            )));
        }
        Ok(ReleaseTag::new(label, start, end))
    }
}

impl Default for TagTemplate {
    fn default() -> Self {
        TagTemplate::new(DEFAULT_TAG_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn test_default_template_is_zero_padded_timestamp() {
        let template = TagTemplate::default();
        assert_eq!(template.label(at(9, 5, 1)), "20260307-090501");
    }

    #[test]
    fn test_tags_sort_chronologically() {
        let template = TagTemplate::default();
        let earlier = template.render(at(9, 5, 1), "aaaaaaaa", "ffffffff").unwrap();
        let later = template.render(at(10, 0, 0), "00000000", "11111111").unwrap();
        assert!(earlier.to_string() < later.to_string());
    }

    #[test]
    fn test_custom_template() {
        let template = TagTemplate::new("v2.4-{timestamp}");
        let tag = template.render(at(1, 2, 3), "1a2b3c4d", "5e6f7a8b").unwrap();
        assert_eq!(tag.to_string(), "v2.4-20260307-010203-1a2b3c4d-5e6f7a8b");
    }

    #[test]
    fn test_parse_round_trip_with_dashed_label() {
        let tag = ReleaseTag::parse("20260307-010203-1a2b3c4d-5e6f7a8b").unwrap();
        assert_eq!(tag.label, "20260307-010203");
        assert_eq!(tag.start, "1a2b3c4d");
        assert_eq!(tag.end, "5e6f7a8b");
    }

    #[test]
    fn test_parse_rejects_names_without_commits() {
        assert!(ReleaseTag::parse("release-1").is_err());
        assert!(ReleaseTag::parse("v1.0-zzzzzzzz-5e6f7a8b").is_err());
        assert!(ReleaseTag::parse("").is_err());
    }

    #[test]
    fn test_root_start() {
        let tag = ReleaseTag::new("x", ROOT_START_ID, "5e6f7a8b");
        assert!(tag.starts_at_root());
    }

    #[test]
    fn test_render_rejects_quotes() {
        let template = TagTemplate::new("it's");
        assert!(template.render(at(0, 0, 0), "00000000", "5e6f7a8b").is_err());
    }
}
