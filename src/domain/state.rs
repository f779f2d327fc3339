use chrono::{DateTime, Utc};

use crate::domain::tag::ReleaseTag;
use crate::error::Result;

/// The last release applied to a database, as recorded on that database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseState {
    /// Commit token (full or abbreviated id) the database was last released to
    pub last_applied_commit: String,
    /// Full name of the last applied bundle
    pub last_applied_tag: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl ReleaseState {
    pub fn new(
        last_applied_commit: impl Into<String>,
        last_applied_tag: impl Into<String>,
        applied_at: Option<DateTime<Utc>>,
    ) -> Self {
        ReleaseState {
            last_applied_commit: last_applied_commit.into(),
            last_applied_tag: last_applied_tag.into(),
            applied_at,
        }
    }

    /// Derive the state from a recorded bundle name; its end commit is the
    /// commit the database was released to
    pub fn from_bundle_name(name: &str, applied_at: Option<DateTime<Utc>>) -> Result<Self> {
        let tag = ReleaseTag::parse(name)?;
        Ok(ReleaseState::new(tag.end, name.trim(), applied_at))
    }
}
